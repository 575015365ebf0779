//! Economy Engine: purchases and redemptions.

use std::sync::Arc;

use chrono::Utc;
use questline_core::economy::validate_contact_email;
use questline_core::error::CoreError;
use questline_core::types::{DbId, Timestamp};
use questline_db::models::purchase::{InventoryItem, NewPurchase, Purchase, Redemption};
use questline_db::models::shop_item::ShopItem;
use questline_db::{LedgerError, LedgerResult, LedgerStore};
use uuid::Uuid;

#[derive(Clone)]
pub struct EconomyEngine {
    store: Arc<dyn LedgerStore>,
}

impl EconomyEngine {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// The shop catalog, ordered by id.
    pub async fn shop_items(&self) -> LedgerResult<Vec<ShopItem>> {
        self.store.list_shop_items().await
    }

    /// Buy one unit of `item_id`. The returned purchase carries the fresh
    /// redemption token in `purchase_id`.
    pub async fn buy(&self, user_id: DbId, item_id: DbId, contact_email: &str) -> LedgerResult<Purchase> {
        validate_contact_email(contact_email)?;

        let result = self
            .store
            .purchase(&NewPurchase {
                user_id,
                item_id,
                purchase_id: Uuid::new_v4(),
                email: contact_email.trim().to_string(),
            })
            .await;

        match &result {
            Ok(purchase) => tracing::info!(
                user_id,
                item_id,
                purchase_id = %purchase.purchase_id,
                "Purchase created",
            ),
            Err(LedgerError::Rejected(reason)) => {
                tracing::debug!(user_id, item_id, %reason, "Purchase rejected")
            }
            Err(LedgerError::Store(e)) => {
                tracing::error!(user_id, item_id, error = %e, "Purchase transaction failed")
            }
        }
        result
    }

    /// Redeem a purchase by its textual token.
    pub async fn redeem(&self, token: &str) -> LedgerResult<Redemption> {
        self.redeem_at(token, Utc::now()).await
    }

    pub async fn redeem_at(&self, token: &str, now: Timestamp) -> LedgerResult<Redemption> {
        let purchase_id = Uuid::parse_str(token.trim()).map_err(|_| CoreError::NotFoundByKey {
            entity: "Purchase",
            key: token.to_string(),
        })?;

        let redemption = self.store.redeem(purchase_id, now).await?;
        tracing::info!(
            purchase_id = %redemption.purchase_id,
            item = %redemption.item_name,
            "Purchase redeemed",
        );
        Ok(redemption)
    }

    /// A user's purchases, newest first.
    pub async fn inventory(&self, user_id: DbId) -> LedgerResult<Vec<InventoryItem>> {
        self.store.inventory(user_id).await
    }
}
