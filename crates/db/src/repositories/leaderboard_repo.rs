//! Leaderboard queries.
//!
//! Both queries share one total order: balance descending, completed-task
//! count descending, user id ascending. It must stay in sync with
//! `questline_core::ranking::RankingKey`.

use questline_core::types::DbId;
use sqlx::PgPool;

use crate::models::leaderboard::{LeaderboardRow, Standing};

/// Every user's ranking fields.
const RANKED_USERS: &str = "SELECT u.id AS user_id, u.username, u.balance, u.current_streak, \
     (SELECT COUNT(*) FROM user_tasks ut \
      WHERE ut.user_id = u.id AND ut.status = 'completed') AS completed_tasks_count \
     FROM users u";

pub struct LeaderboardRepo;

impl LeaderboardRepo {
    /// The first `limit` users in ranking order.
    pub async fn top(pool: &PgPool, limit: i64) -> Result<Vec<LeaderboardRow>, sqlx::Error> {
        let query = format!(
            "WITH ranked AS ({RANKED_USERS})
             SELECT user_id, username, balance, completed_tasks_count, current_streak
             FROM ranked
             ORDER BY balance DESC, completed_tasks_count DESC, user_id ASC
             LIMIT $1"
        );
        sqlx::query_as::<_, LeaderboardRow>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// One user's row and the number of users strictly ahead of them.
    pub async fn standing(pool: &PgPool, user_id: DbId) -> Result<Option<Standing>, sqlx::Error> {
        let query = format!(
            "WITH ranked AS ({RANKED_USERS})
             SELECT me.user_id, me.username, me.balance, me.completed_tasks_count, me.current_streak,
                    (SELECT COUNT(*) FROM ranked o
                     WHERE o.balance > me.balance
                        OR (o.balance = me.balance
                            AND o.completed_tasks_count > me.completed_tasks_count)
                        OR (o.balance = me.balance
                            AND o.completed_tasks_count = me.completed_tasks_count
                            AND o.user_id < me.user_id)) AS ahead
             FROM ranked me
             WHERE me.user_id = $1"
        );
        sqlx::query_as::<_, Standing>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
