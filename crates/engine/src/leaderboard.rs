//! Leaderboard Ranker.
//!
//! The snapshot is read without locks and may be stale by the time it is
//! returned. Ranks are consistent within one snapshot only.

use std::sync::Arc;

use questline_core::ranking::LEADERBOARD_TOP_LIMIT;
use questline_core::types::{DbId, Points};
use questline_db::models::leaderboard::LeaderboardRow;
use questline_db::{LedgerResult, LedgerStore};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-indexed.
    pub rank: i64,
    pub user_id: DbId,
    pub username: String,
    pub balance: Points,
    pub completed_tasks_count: i64,
    pub current_streak: i32,
}

impl LeaderboardEntry {
    fn ranked(rank: i64, row: LeaderboardRow) -> Self {
        Self {
            rank,
            user_id: row.user_id,
            username: row.username,
            balance: row.balance,
            completed_tasks_count: row.completed_tasks_count,
            current_streak: row.current_streak,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    pub top: Vec<LeaderboardEntry>,
    /// The requesting user's own entry, when a known user asked.
    pub current: Option<LeaderboardEntry>,
}

#[derive(Clone)]
pub struct LeaderboardRanker {
    store: Arc<dyn LedgerStore>,
}

impl LeaderboardRanker {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    pub async fn leaderboard(&self, current_user_id: Option<DbId>) -> LedgerResult<Leaderboard> {
        let top: Vec<LeaderboardEntry> = self
            .store
            .top_ranked(LEADERBOARD_TOP_LIMIT as i64)
            .await?
            .into_iter()
            .zip(1..)
            .map(|(row, rank)| LeaderboardEntry::ranked(rank, row))
            .collect();

        let current = match current_user_id {
            Some(user_id) => self
                .store
                .standing(user_id)
                .await?
                .map(|s| LeaderboardEntry::ranked(s.ahead + 1, s.row)),
            None => None,
        };

        Ok(Leaderboard { top, current })
    }
}
