//! Handlers for the `/shop` resource.

use axum::extract::State;
use axum::Json;
use questline_core::types::{DbId, Timestamp};
use questline_db::models::shop_item::ShopItem;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BuyItemRequest {
    pub item_id: DbId,
    /// Contact address the item is delivered to.
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct BuyItemResponse {
    /// Redemption token to show an admin.
    pub purchase_id: Uuid,
    pub item_id: DbId,
    pub status: String,
    pub purchased_at: Timestamp,
}

/// GET /api/v1/shop/items
pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<ShopItem>>>> {
    let items = state.engine.economy.shop_items().await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/shop/buy
pub async fn buy_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<BuyItemRequest>,
) -> AppResult<Json<DataResponse<BuyItemResponse>>> {
    let purchase = state
        .engine
        .economy
        .buy(user.user_id, input.item_id, &input.email)
        .await?;

    Ok(Json(DataResponse {
        data: BuyItemResponse {
            purchase_id: purchase.purchase_id,
            item_id: purchase.item_id,
            status: purchase.status,
            purchased_at: purchase.purchased_at,
        },
    }))
}
