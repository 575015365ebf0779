//! Leaderboard read projections.

use questline_core::ranking::RankingKey;
use questline_core::types::{DbId, Points};
use serde::Serialize;
use sqlx::FromRow;

/// A user's ranking fields, unranked.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct LeaderboardRow {
    pub user_id: DbId,
    pub username: String,
    pub balance: Points,
    pub completed_tasks_count: i64,
    pub current_streak: i32,
}

impl LeaderboardRow {
    pub fn ranking_key(&self) -> RankingKey {
        RankingKey {
            user_id: self.user_id,
            balance: self.balance,
            completed_tasks: self.completed_tasks_count,
        }
    }
}

/// One user's row plus the number of users ranked strictly ahead of them.
#[derive(Debug, Clone, FromRow)]
pub struct Standing {
    pub ahead: i64,
    #[sqlx(flatten)]
    pub row: LeaderboardRow,
}
