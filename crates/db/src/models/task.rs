//! Task entity model and DTOs.

use questline_core::grading::TaskKind;
use questline_core::types::{DbId, Points, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// One question of a multi-question task, stored in `tasks.questions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionItem {
    /// `choice` or `text`.
    #[serde(rename = "type")]
    pub question_type: String,
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub correct_answer: String,
}

impl QuestionItem {
    /// The question as shown to a user, without its answer.
    pub fn without_answer(self) -> Self {
        Self {
            correct_answer: String::new(),
            ..self
        }
    }
}

/// Full task row from the `tasks` table.
#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub task_type: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub questions: Json<Vec<QuestionItem>>,
    pub reward: Points,
    pub position: i32,
    pub language: String,
    pub created_at: Timestamp,
}

impl Task {
    pub fn kind(&self) -> TaskKind {
        TaskKind::from_type(&self.task_type)
    }
}

/// DTO for creating a task. Written by task authoring, never by the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub task_type: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub questions: Vec<QuestionItem>,
    pub reward: Points,
    pub position: i32,
    pub language: String,
}
