//! Purchase entity model, DTOs, and read projections.

use questline_core::economy::PurchaseStatus;
use questline_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Full purchase row from the `purchases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Purchase {
    pub id: DbId,
    pub user_id: DbId,
    pub item_id: DbId,
    /// External redemption token, independent of `id`.
    pub purchase_id: Uuid,
    pub status: String,
    pub email: String,
    pub purchased_at: Timestamp,
    pub redeemed_at: Option<Timestamp>,
}

impl Purchase {
    pub fn status(&self) -> PurchaseStatus {
        PurchaseStatus::from_db(&self.status)
    }
}

/// Input for the buy transaction.
#[derive(Debug, Clone)]
pub struct NewPurchase {
    pub user_id: DbId,
    pub item_id: DbId,
    pub purchase_id: Uuid,
    pub email: String,
}

/// A purchase as listed in the buyer's inventory.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryItem {
    pub id: DbId,
    pub item_id: DbId,
    pub item_name: String,
    pub purchase_id: Uuid,
    pub status: String,
    pub purchased_at: Timestamp,
}

/// Result of a successful redemption.
#[derive(Debug, Clone, Serialize)]
pub struct Redemption {
    pub purchase_id: Uuid,
    pub item_name: String,
    pub user_display_name: String,
    pub redeemed_at: Timestamp,
}
