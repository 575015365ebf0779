//! Admin-only handlers: redemption and platform overview.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use questline_core::streak::utc_day;
use questline_db::models::metrics::PlatformMetrics;
use questline_db::models::purchase::Redemption;
use questline_db::models::user::UserSummary;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub purchase_id: String,
}

#[derive(Debug, Serialize)]
pub struct PlatformMetricsResponse {
    #[serde(flatten)]
    pub metrics: PlatformMetrics,
    pub avg_tasks_per_user: f64,
}

/// POST /api/v1/admin/redeem
pub async fn redeem(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<RedeemRequest>,
) -> AppResult<Json<DataResponse<Redemption>>> {
    if input.purchase_id.trim().is_empty() {
        return Err(AppError::BadRequest("purchase_id is required".into()));
    }

    let redemption = state.engine.economy.redeem(&input.purchase_id).await?;
    tracing::info!(
        admin_id = admin.user_id,
        purchase_id = %redemption.purchase_id,
        "Admin redeemed purchase",
    );
    Ok(Json(DataResponse { data: redemption }))
}

/// GET /api/v1/admin/metrics
pub async fn metrics(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<PlatformMetricsResponse>>> {
    let metrics = state.ledger.platform_metrics(utc_day(Utc::now())).await?;
    Ok(Json(DataResponse {
        data: PlatformMetricsResponse {
            avg_tasks_per_user: metrics.avg_tasks_per_user(),
            metrics,
        },
    }))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserSummary>>>> {
    let users = state.ledger.list_user_summaries().await?;
    Ok(Json(DataResponse { data: users }))
}
