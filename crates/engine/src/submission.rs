//! Submission Evaluator: grade an answer and drive the reward transaction.

use std::sync::Arc;

use chrono::Utc;
use questline_core::error::CoreError;
use questline_core::grading::{grade, TaskKind};
use questline_core::types::{DbId, Points, Timestamp};
use questline_db::ledger::CompletionOutcome;
use questline_db::models::user_task::CompleteTask;
use questline_db::{LedgerResult, LedgerStore};
use serde::Serialize;

/// Result of grading one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub correct: bool,
    pub earned: Points,
    /// The task had been completed before this submission; nothing was
    /// credited.
    pub already_completed: bool,
    /// Balance after the submission. Unchanged on a wrong answer.
    pub balance: Points,
    pub current_streak: i32,
    /// Revealed for quizzes only.
    pub correct_answer: Option<String>,
}

#[derive(Clone)]
pub struct SubmissionEvaluator {
    store: Arc<dyn LedgerStore>,
}

impl SubmissionEvaluator {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Grade `answer` for `task_id` at the current time.
    pub async fn submit(&self, user_id: DbId, task_id: DbId, answer: &str) -> LedgerResult<Submission> {
        self.submit_at(user_id, task_id, answer, Utc::now()).await
    }

    /// Grade `answer` as if submitted at `now`. The streak uses the UTC day
    /// of `now`.
    pub async fn submit_at(
        &self,
        user_id: DbId,
        task_id: DbId,
        answer: &str,
        now: Timestamp,
    ) -> LedgerResult<Submission> {
        let task = self
            .store
            .find_task(task_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Task",
                id: task_id,
            })?;
        let kind = task.kind();
        let correct_answer = match kind {
            TaskKind::Quiz => Some(task.correct_answer.clone()),
            TaskKind::Survey => None,
        };

        if !grade(kind, &task.correct_answer, answer) {
            let user = self
                .store
                .user_summary(user_id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "User",
                    id: user_id,
                })?;
            tracing::debug!(user_id, task_id, "Incorrect answer");
            return Ok(Submission {
                correct: false,
                earned: 0,
                already_completed: false,
                balance: user.user.balance,
                current_streak: user.user.current_streak,
                correct_answer,
            });
        }

        let outcome = self
            .store
            .record_completion(&CompleteTask {
                user_id,
                task_id,
                reward: task.reward,
                now,
            })
            .await?;

        let submission = match outcome {
            CompletionOutcome::Granted { balance, streak } => {
                tracing::info!(
                    user_id,
                    task_id,
                    earned = task.reward,
                    balance,
                    streak = streak.streak,
                    "Task completed",
                );
                Submission {
                    correct: true,
                    earned: task.reward,
                    already_completed: false,
                    balance,
                    current_streak: streak.streak,
                    correct_answer,
                }
            }
            CompletionOutcome::AlreadyCompleted {
                balance,
                current_streak,
            } => {
                tracing::debug!(user_id, task_id, "Task already completed, no reward");
                Submission {
                    correct: true,
                    earned: 0,
                    already_completed: true,
                    balance,
                    current_streak,
                    correct_answer,
                }
            }
        };
        Ok(submission)
    }
}
