//! Repository for the `user_tasks` table and the reward-and-streak
//! transaction.

use std::collections::HashSet;

use questline_core::error::CoreError;
use questline_core::streak::{next_streak, utc_day};
use questline_core::types::{DbId, Day, Points};
use sqlx::PgPool;

use crate::ledger::{CompletionOutcome, LedgerResult};
use crate::models::user_task::{CompleteTask, PROGRESS_COMPLETED};

pub struct UserTaskRepo;

impl UserTaskRepo {
    /// IDs of every task the user has completed.
    pub async fn completed_task_ids(pool: &PgPool, user_id: DbId) -> Result<HashSet<DbId>, sqlx::Error> {
        let ids = sqlx::query_scalar::<_, DbId>(
            "SELECT task_id FROM user_tasks WHERE user_id = $1 AND status = $2",
        )
        .bind(user_id)
        .bind(PROGRESS_COMPLETED)
        .fetch_all(pool)
        .await?;
        Ok(ids.into_iter().collect())
    }

    /// Claim the progress row, credit the reward, and advance the streak in
    /// one transaction.
    ///
    /// The user row is locked first so concurrent completions by the same
    /// user serialize. The claim is an `ON CONFLICT DO NOTHING` insert: when
    /// it inserts nothing the task was already completed and the transaction
    /// is abandoned without writes.
    pub async fn complete(pool: &PgPool, input: &CompleteTask) -> LedgerResult<CompletionOutcome> {
        let mut tx = pool.begin().await?;

        let locked = sqlx::query_as::<_, (Points, i32)>(
            "SELECT balance, current_streak FROM users WHERE id = $1 FOR UPDATE",
        )
        .bind(input.user_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((balance, current_streak)) = locked else {
            return Err(CoreError::NotFound {
                entity: "User",
                id: input.user_id,
            }
            .into());
        };

        let claimed = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO user_tasks (user_id, task_id, status, earned, completed_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT ON CONSTRAINT uq_user_tasks_user_task DO NOTHING
             RETURNING id",
        )
        .bind(input.user_id)
        .bind(input.task_id)
        .bind(PROGRESS_COMPLETED)
        .bind(input.reward)
        .bind(input.now)
        .fetch_optional(&mut *tx)
        .await?;
        if claimed.is_none() {
            return Ok(CompletionOutcome::AlreadyCompleted {
                balance,
                current_streak,
            });
        }

        let (balance, current_streak, last_task_date) = sqlx::query_as::<_, (Points, i32, Option<Day>)>(
            "UPDATE users SET balance = balance + $2 WHERE id = $1
             RETURNING balance, current_streak, last_task_date",
        )
        .bind(input.user_id)
        .bind(input.reward)
        .fetch_one(&mut *tx)
        .await?;

        let streak = next_streak(last_task_date, utc_day(input.now), current_streak);
        sqlx::query("UPDATE users SET current_streak = $2, last_task_date = $3 WHERE id = $1")
            .bind(input.user_id)
            .bind(streak.streak)
            .bind(streak.last_date)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(CompletionOutcome::Granted { balance, streak })
    }
}
