//! PostgreSQL-backed [`LedgerStore`].

use std::collections::HashSet;

use async_trait::async_trait;
use questline_core::types::{DbId, Day, Timestamp};
use sqlx::PgPool;
use uuid::Uuid;

use super::{CompletionOutcome, LedgerResult, LedgerStore};
use crate::models::leaderboard::{LeaderboardRow, Standing};
use crate::models::metrics::{PlatformMetrics, UserMetrics};
use crate::models::purchase::{InventoryItem, NewPurchase, Purchase, Redemption};
use crate::models::shop_item::ShopItem;
use crate::models::task::Task;
use crate::models::user::UserSummary;
use crate::models::user_task::CompleteTask;
use crate::repositories::{
    LeaderboardRepo, MetricsRepo, PurchaseRepo, ShopItemRepo, TaskRepo, UserRepo, UserTaskRepo,
};

/// Ledger store over a shared connection pool.
#[derive(Clone)]
pub struct PgLedger {
    pool: PgPool,
}

impl PgLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for PgLedger {
    async fn health_check(&self) -> LedgerResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn user_summary(&self, user_id: DbId) -> LedgerResult<Option<UserSummary>> {
        Ok(UserRepo::find_summary(&self.pool, user_id).await?)
    }

    async fn list_user_summaries(&self) -> LedgerResult<Vec<UserSummary>> {
        Ok(UserRepo::list_summaries(&self.pool).await?)
    }

    async fn find_task(&self, task_id: DbId) -> LedgerResult<Option<Task>> {
        Ok(TaskRepo::find_by_id(&self.pool, task_id).await?)
    }

    async fn list_tasks(&self, language: &str) -> LedgerResult<Vec<Task>> {
        Ok(TaskRepo::list_by_language(&self.pool, language).await?)
    }

    async fn completed_task_ids(&self, user_id: DbId) -> LedgerResult<HashSet<DbId>> {
        Ok(UserTaskRepo::completed_task_ids(&self.pool, user_id).await?)
    }

    async fn record_completion(&self, input: &CompleteTask) -> LedgerResult<CompletionOutcome> {
        UserTaskRepo::complete(&self.pool, input).await
    }

    async fn list_shop_items(&self) -> LedgerResult<Vec<ShopItem>> {
        Ok(ShopItemRepo::list(&self.pool).await?)
    }

    async fn purchase(&self, input: &NewPurchase) -> LedgerResult<Purchase> {
        PurchaseRepo::buy(&self.pool, input).await
    }

    async fn redeem(&self, purchase_id: Uuid, now: Timestamp) -> LedgerResult<Redemption> {
        PurchaseRepo::redeem(&self.pool, purchase_id, now).await
    }

    async fn inventory(&self, user_id: DbId) -> LedgerResult<Vec<InventoryItem>> {
        Ok(PurchaseRepo::list_inventory(&self.pool, user_id).await?)
    }

    async fn top_ranked(&self, limit: i64) -> LedgerResult<Vec<LeaderboardRow>> {
        Ok(LeaderboardRepo::top(&self.pool, limit).await?)
    }

    async fn standing(&self, user_id: DbId) -> LedgerResult<Option<Standing>> {
        Ok(LeaderboardRepo::standing(&self.pool, user_id).await?)
    }

    async fn user_metrics(&self, user_id: DbId) -> LedgerResult<Option<UserMetrics>> {
        Ok(MetricsRepo::user_metrics(&self.pool, user_id).await?)
    }

    async fn platform_metrics(&self, today: Day) -> LedgerResult<PlatformMetrics> {
        Ok(MetricsRepo::platform_metrics(&self.pool, today).await?)
    }
}
