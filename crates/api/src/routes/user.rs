//! Route definitions for the caller's own `/user` resources.

use axum::routing::get;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// GET /me          -> me
/// GET /inventory   -> inventory
/// GET /metrics     -> metrics
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(user::me))
        .route("/inventory", get(user::inventory))
        .route("/metrics", get(user::metrics))
}
