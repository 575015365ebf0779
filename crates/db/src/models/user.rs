//! User entity model and DTOs.

use questline_core::types::{DbId, Day, Points, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub telegram_id: Option<i64>,
    pub phone_number: Option<String>,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub photo_url: Option<String>,
    pub balance: Points,
    pub current_streak: i32,
    pub last_task_date: Option<Day>,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A user together with the number of tasks they completed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub user: User,
    pub completed_tasks_count: i64,
}

/// DTO for creating a user. Written by the identity layer, never by the engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUser {
    pub telegram_id: Option<i64>,
    pub phone_number: Option<String>,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub photo_url: Option<String>,
    /// `None` means the default `student` role.
    pub role: Option<String>,
}
