use axum::extract::State;
use axum::Json;
use questline_engine::Leaderboard;

use crate::error::AppResult;
use crate::middleware::auth::MaybeAuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/leaderboard
///
/// Public. When the request carries a valid token, `current` holds the
/// caller's own rank.
pub async fn get_leaderboard(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
) -> AppResult<Json<DataResponse<Leaderboard>>> {
    let board = state
        .engine
        .ranker
        .leaderboard(user.map(|u| u.user_id))
        .await?;
    Ok(Json(DataResponse { data: board }))
}
