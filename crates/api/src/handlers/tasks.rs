//! Handlers for the `/tasks` resource.
//!
//! Tasks are listed per language partition with the caller's status on each.
//! Opening or submitting a task that is still locked is refused with 403.

use axum::extract::{Path, Query, State};
use axum::Json;
use questline_core::grading::resolve_answer;
use questline_core::sequencing::TaskStatus;
use questline_core::types::{DbId, Points};
use questline_db::models::task::QuestionItem;
use questline_engine::SequencedTask;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the task map.
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    /// Language partition; the configured default when absent.
    pub language: Option<String>,
}

/// A task as shown to a user who may open it. The correct answer is never
/// included.
#[derive(Debug, Serialize)]
pub struct TaskDetail {
    pub id: DbId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub question: String,
    pub options: Vec<String>,
    pub questions: Vec<QuestionItem>,
    pub reward: Points,
    pub position: i32,
    pub language: String,
    pub status: TaskStatus,
}

/// Request body for a submission. A non-empty `answer` wins over
/// `answer_index`.
#[derive(Debug, Deserialize)]
pub struct SubmitTaskRequest {
    pub answer: Option<String>,
    pub answer_index: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SubmitTaskResponse {
    pub success: bool,
    pub earned: Points,
    pub new_balance: Points,
    pub current_streak: i32,
    pub already_completed: bool,
    /// Present for quizzes only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

/// GET /api/v1/tasks?language=
pub async fn list_tasks(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<TaskListQuery>,
) -> AppResult<Json<DataResponse<Vec<SequencedTask>>>> {
    let language = params
        .language
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(state.config.default_task_language.as_str());

    let tasks = state.engine.sequencer.task_map(user.user_id, language).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// GET /api/v1/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TaskDetail>>> {
    let opened = state.engine.sequencer.open_task(user.user_id, id).await?;
    let task = opened.task;

    Ok(Json(DataResponse {
        data: TaskDetail {
            id: task.id,
            title: task.title,
            description: task.description,
            task_type: task.task_type,
            question: task.question,
            options: task.options,
            questions: task
                .questions
                .0
                .into_iter()
                .map(QuestionItem::without_answer)
                .collect(),
            reward: task.reward,
            position: task.position,
            language: task.language,
            status: opened.status,
        },
    }))
}

/// POST /api/v1/tasks/{id}/submit
pub async fn submit_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<SubmitTaskRequest>,
) -> AppResult<Json<DataResponse<SubmitTaskResponse>>> {
    let opened = state.engine.sequencer.open_task(user.user_id, id).await?;
    let answer = resolve_answer(
        input.answer.as_deref(),
        input.answer_index,
        &opened.task.options,
    );

    let result = state
        .engine
        .evaluator
        .submit(user.user_id, id, &answer)
        .await?;

    Ok(Json(DataResponse {
        data: SubmitTaskResponse {
            success: result.correct,
            earned: result.earned,
            new_balance: result.balance,
            current_streak: result.current_streak,
            already_completed: result.already_completed,
            correct_answer: result.correct_answer,
        },
    }))
}
