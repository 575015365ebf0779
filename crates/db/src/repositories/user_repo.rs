//! Repository for the `users` table.

use questline_core::roles::ROLE_STUDENT;
use questline_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User, UserSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, telegram_id, phone_number, username, first_name, last_name, \
                       photo_url, balance, current_streak, last_task_date, role, \
                       created_at, updated_at";

/// Same columns qualified with the `u` alias plus the completed-task count.
const SUMMARY_COLUMNS: &str = "u.id, u.telegram_id, u.phone_number, u.username, u.first_name, \
     u.last_name, u.photo_url, u.balance, u.current_streak, u.last_task_date, u.role, \
     u.created_at, u.updated_at, \
     (SELECT COUNT(*) FROM user_tasks ut \
      WHERE ut.user_id = u.id AND ut.status = 'completed') AS completed_tasks_count";

/// Provides read and create operations for users.
///
/// Balances and streaks are only ever written by the ledger transactions in
/// [`UserTaskRepo`](super::UserTaskRepo) and [`PurchaseRepo`](super::PurchaseRepo).
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user with a zero balance, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (telegram_id, phone_number, username, first_name, last_name, photo_url, role)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(input.telegram_id)
            .bind(&input.phone_number)
            .bind(&input.username)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.photo_url)
            .bind(input.role.as_deref().unwrap_or(ROLE_STUDENT))
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user with their completed-task count.
    pub async fn find_summary(pool: &PgPool, id: DbId) -> Result<Option<UserSummary>, sqlx::Error> {
        let query = format!("SELECT {SUMMARY_COLUMNS} FROM users u WHERE u.id = $1");
        sqlx::query_as::<_, UserSummary>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all users with completed-task counts, most recently created first.
    pub async fn list_summaries(pool: &PgPool) -> Result<Vec<UserSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM users u ORDER BY u.created_at DESC, u.id DESC"
        );
        sqlx::query_as::<_, UserSummary>(&query).fetch_all(pool).await
    }
}
