//! Repository for the `shop_items` table.

use questline_core::types::DbId;
use sqlx::PgPool;

use crate::models::shop_item::{CreateShopItem, ShopItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, price, image, stock, created_at";

/// Catalog reads. Stock is only decremented inside
/// [`PurchaseRepo::buy`](super::PurchaseRepo::buy).
pub struct ShopItemRepo;

impl ShopItemRepo {
    /// Insert a new item, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateShopItem) -> Result<ShopItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO shop_items (name, description, price, image, stock)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ShopItem>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(&input.image)
            .bind(input.stock)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ShopItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shop_items WHERE id = $1");
        sqlx::query_as::<_, ShopItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all items ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<ShopItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shop_items ORDER BY id");
        sqlx::query_as::<_, ShopItem>(&query).fetch_all(pool).await
    }
}
