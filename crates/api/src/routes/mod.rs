pub mod admin;
pub mod health;
pub mod shop;
pub mod tasks;
pub mod user;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /tasks                      task map for a language (auth)
/// /tasks/{id}                 task detail, 403 when locked (auth)
/// /tasks/{id}/submit          submit an answer (auth, POST)
///
/// /shop/items                 catalog (public)
/// /shop/buy                   buy one item (auth, POST)
///
/// /user/me                    own profile (auth)
/// /user/inventory             own purchases (auth)
/// /user/metrics               own earning and spending totals (auth)
///
/// /leaderboard                top 20 plus own rank (optional auth)
///
/// /admin/redeem               redeem a purchase token (admin, POST)
/// /admin/metrics              platform totals (admin)
/// /admin/users                all users (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/tasks", tasks::router())
        .nest("/shop", shop::router())
        .nest("/user", user::router())
        .route("/leaderboard", get(handlers::leaderboard::get_leaderboard))
        .nest("/admin", admin::router())
}
