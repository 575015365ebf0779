//! Shop item entity model and DTOs.

use questline_core::types::{DbId, Points, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShopItem {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub price: Points,
    pub image: String,
    pub stock: i32,
    pub created_at: Timestamp,
}

/// DTO for stocking a new item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShopItem {
    pub name: String,
    pub description: String,
    pub price: Points,
    pub image: String,
    pub stock: i32,
}
