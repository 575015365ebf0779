//! Route definitions for `/admin`. Every handler requires the admin role.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST /redeem    -> redeem
/// GET  /metrics   -> metrics
/// GET  /users     -> list_users
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/redeem", post(admin::redeem))
        .route("/metrics", get(admin::metrics))
        .route("/users", get(admin::list_users))
}
