//! Repository for the `purchases` table and the buy and redeem transactions.

use questline_core::economy::{check_purchase, display_name, PurchaseStatus, PURCHASE_PENDING, PURCHASE_REDEEMED};
use questline_core::error::CoreError;
use questline_core::types::{DbId, Points, Timestamp};
use sqlx::PgPool;
use uuid::Uuid;

use crate::ledger::LedgerResult;
use crate::models::purchase::{InventoryItem, NewPurchase, Purchase, Redemption};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, item_id, purchase_id, status, email, purchased_at, redeemed_at";

/// Row read while locking a purchase for redemption.
#[derive(sqlx::FromRow)]
struct RedeemTarget {
    id: DbId,
    status: String,
    item_name: String,
    first_name: String,
    last_name: String,
    username: String,
}

pub struct PurchaseRepo;

impl PurchaseRepo {
    /// Debit the price, take one unit of stock, and insert a pending purchase
    /// in one transaction.
    ///
    /// The balance and stock updates carry their own guards, so two
    /// concurrent buyers can never drive either value below zero even when
    /// both passed the precondition read.
    pub async fn buy(pool: &PgPool, input: &NewPurchase) -> LedgerResult<Purchase> {
        let mut tx = pool.begin().await?;

        let balance = sqlx::query_scalar::<_, Points>("SELECT balance FROM users WHERE id = $1")
            .bind(input.user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: input.user_id,
            })?;

        let (price, stock) =
            sqlx::query_as::<_, (Points, i32)>("SELECT price, stock FROM shop_items WHERE id = $1")
                .bind(input.item_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "ShopItem",
                    id: input.item_id,
                })?;

        check_purchase(balance, price, input.item_id, stock)?;

        let debited = sqlx::query("UPDATE users SET balance = balance - $2 WHERE id = $1 AND balance >= $2")
            .bind(input.user_id)
            .bind(price)
            .execute(&mut *tx)
            .await?;
        if debited.rows_affected() == 0 {
            return Err(CoreError::InsufficientBalance { balance, price }.into());
        }

        let taken = sqlx::query("UPDATE shop_items SET stock = stock - 1 WHERE id = $1 AND stock > 0")
            .bind(input.item_id)
            .execute(&mut *tx)
            .await?;
        if taken.rows_affected() == 0 {
            return Err(CoreError::OutOfStock {
                item_id: input.item_id,
            }
            .into());
        }

        let query = format!(
            "INSERT INTO purchases (user_id, item_id, purchase_id, status, email)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let purchase = sqlx::query_as::<_, Purchase>(&query)
            .bind(input.user_id)
            .bind(input.item_id)
            .bind(input.purchase_id)
            .bind(PURCHASE_PENDING)
            .bind(input.email.trim())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(purchase)
    }

    /// Mark a pending purchase redeemed. A purchase can be redeemed at most
    /// once.
    pub async fn redeem(pool: &PgPool, purchase_id: Uuid, now: Timestamp) -> LedgerResult<Redemption> {
        let mut tx = pool.begin().await?;

        let target = sqlx::query_as::<_, RedeemTarget>(
            "SELECT p.id, p.status, i.name AS item_name,
                    u.first_name, u.last_name, u.username
             FROM purchases p
             JOIN shop_items i ON i.id = p.item_id
             JOIN users u ON u.id = p.user_id
             WHERE p.purchase_id = $1
             FOR UPDATE OF p",
        )
        .bind(purchase_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| CoreError::NotFoundByKey {
            entity: "Purchase",
            key: purchase_id.to_string(),
        })?;

        if PurchaseStatus::from_db(&target.status) == PurchaseStatus::Redeemed {
            return Err(CoreError::AlreadyRedeemed {
                purchase_id: purchase_id.to_string(),
            }
            .into());
        }

        let updated = sqlx::query(
            "UPDATE purchases SET status = $2, redeemed_at = $3 WHERE id = $1 AND status = $4",
        )
        .bind(target.id)
        .bind(PURCHASE_REDEEMED)
        .bind(now)
        .bind(PURCHASE_PENDING)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(CoreError::AlreadyRedeemed {
                purchase_id: purchase_id.to_string(),
            }
            .into());
        }

        tx.commit().await?;
        Ok(Redemption {
            purchase_id,
            user_display_name: display_name(&target.first_name, &target.last_name, &target.username),
            item_name: target.item_name,
            redeemed_at: now,
        })
    }

    /// A user's purchases joined with item names, newest first.
    pub async fn list_inventory(pool: &PgPool, user_id: DbId) -> Result<Vec<InventoryItem>, sqlx::Error> {
        sqlx::query_as::<_, InventoryItem>(
            "SELECT p.id, p.item_id, i.name AS item_name, p.purchase_id, p.status, p.purchased_at
             FROM purchases p
             JOIN shop_items i ON i.id = p.item_id
             WHERE p.user_id = $1
             ORDER BY p.purchased_at DESC, p.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
