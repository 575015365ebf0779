//! Handlers for the caller's own profile (`/user`).

use axum::extract::State;
use axum::Json;
use questline_core::error::CoreError;
use questline_core::types::Points;
use questline_db::models::metrics::UserMetrics;
use questline_db::models::purchase::InventoryItem;
use questline_db::models::user::UserSummary;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UserMetricsResponse {
    #[serde(flatten)]
    pub metrics: UserMetrics,
    /// Total earned minus total spent.
    pub net_balance: Points,
}

/// GET /api/v1/user/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<UserSummary>>> {
    let summary = state
        .ledger
        .user_summary(user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        })?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/user/inventory
pub async fn inventory(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<InventoryItem>>>> {
    let items = state.engine.economy.inventory(user.user_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/user/metrics
pub async fn metrics(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<UserMetricsResponse>>> {
    let metrics = state
        .ledger
        .user_metrics(user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        })?;
    Ok(Json(DataResponse {
        data: UserMetricsResponse {
            net_balance: metrics.net_balance(),
            metrics,
        },
    }))
}
