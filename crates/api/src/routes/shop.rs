//! Route definitions for the `/shop` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::shop;
use crate::state::AppState;

/// Routes mounted at `/shop`.
///
/// ```text
/// GET  /items   -> list_items (public)
/// POST /buy     -> buy_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items", get(shop::list_items))
        .route("/buy", post(shop::buy_item))
}
