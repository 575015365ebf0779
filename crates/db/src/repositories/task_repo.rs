//! Repository for the `tasks` table.
//!
//! The engine only reads tasks. [`TaskRepo::create`] exists for task
//! authoring tooling and tests.

use questline_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::task::{CreateTask, Task};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, task_type, question, options, correct_answer, \
                       questions, reward, position, language, created_at";

pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks
                (title, description, task_type, question, options, correct_answer,
                 questions, reward, position, language)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.task_type)
            .bind(&input.question)
            .bind(&input.options)
            .bind(&input.correct_answer)
            .bind(Json(&input.questions))
            .bind(input.reward)
            .bind(input.position)
            .bind(&input.language)
            .fetch_one(pool)
            .await
    }

    /// Find a task by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the tasks of one language partition in sequence order.
    pub async fn list_by_language(pool: &PgPool, language: &str) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE language = $1 ORDER BY position, id"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(language)
            .fetch_all(pool)
            .await
    }
}
