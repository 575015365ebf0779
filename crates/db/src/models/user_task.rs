//! Per-user task progress (`user_tasks`).
//!
//! A row exists only once the user completed the task; locked and available
//! are never stored.

use questline_core::types::{DbId, Points, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Status value of every `user_tasks` row.
pub const PROGRESS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserTask {
    pub id: DbId,
    pub user_id: DbId,
    pub task_id: DbId,
    pub status: String,
    pub earned: Points,
    pub completed_at: Timestamp,
}

/// Input for the reward-and-streak transaction.
#[derive(Debug, Clone)]
pub struct CompleteTask {
    pub user_id: DbId,
    pub task_id: DbId,
    pub reward: Points,
    pub now: Timestamp,
}
