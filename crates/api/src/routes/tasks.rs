//! Route definitions for the `/tasks` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET  /              -> list_tasks
/// GET  /{id}          -> get_task
/// POST /{id}/submit   -> submit_task
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list_tasks))
        .route("/{id}", get(tasks::get_task))
        .route("/{id}/submit", post(tasks::submit_task))
}
