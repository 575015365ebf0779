//! Task Sequencer: per-user task statuses within a language partition.

use std::sync::Arc;

use questline_core::error::CoreError;
use questline_core::sequencing::{sequence_statuses, status_in_sequence, SequenceEntry, TaskStatus};
use questline_core::types::{DbId, Points};
use questline_db::models::task::Task;
use questline_db::{LedgerResult, LedgerStore};
use serde::Serialize;

/// One task of a user's task map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequencedTask {
    pub id: DbId,
    pub title: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub reward: Points,
    pub position: i32,
    pub status: TaskStatus,
}

/// A task the user is allowed to open, with its current status.
#[derive(Debug, Clone)]
pub struct OpenedTask {
    pub task: Task,
    /// Either `Available` or `Completed`.
    pub status: TaskStatus,
}

fn entries(tasks: &[Task]) -> Vec<SequenceEntry> {
    tasks
        .iter()
        .map(|t| SequenceEntry {
            task_id: t.id,
            position: t.position,
        })
        .collect()
}

#[derive(Clone)]
pub struct TaskSequencer {
    store: Arc<dyn LedgerStore>,
}

impl TaskSequencer {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Every task of `language` in sequence order, each with the user's
    /// status.
    pub async fn task_map(&self, user_id: DbId, language: &str) -> LedgerResult<Vec<SequencedTask>> {
        let tasks = self.store.list_tasks(language).await?;
        let completed = self.store.completed_task_ids(user_id).await?;
        let statuses = sequence_statuses(&entries(&tasks), &completed);

        Ok(tasks
            .into_iter()
            .zip(statuses)
            .map(|(task, status)| SequencedTask {
                id: task.id,
                title: task.title,
                task_type: task.task_type,
                reward: task.reward,
                position: task.position,
                status,
            })
            .collect())
    }

    /// Load a task the user may open. Fails with `NotFound` for an unknown
    /// task and `Locked` when its predecessor is not completed yet.
    pub async fn open_task(&self, user_id: DbId, task_id: DbId) -> LedgerResult<OpenedTask> {
        let task = self
            .store
            .find_task(task_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Task",
                id: task_id,
            })?;

        let partition = self.store.list_tasks(&task.language).await?;
        let completed = self.store.completed_task_ids(user_id).await?;
        let status = status_in_sequence(&entries(&partition), &completed, task_id)
            .unwrap_or(TaskStatus::Available);

        if status == TaskStatus::Locked {
            tracing::debug!(user_id, task_id, "Task is locked");
            return Err(CoreError::Locked { task_id }.into());
        }
        Ok(OpenedTask { task, status })
    }
}
