//! The Ledger Store seam.
//!
//! Engine components hold an `Arc<dyn LedgerStore>` handed to them at
//! construction. [`PgLedger`] is the production implementation;
//! [`MemoryLedger`] gives every test its own isolated store.
//!
//! Every mutating method runs as exactly one transaction: either all of its
//! writes become visible or none do.

use std::collections::HashSet;

use async_trait::async_trait;
use questline_core::error::CoreError;
use questline_core::streak::StreakUpdate;
use questline_core::types::{DbId, Day, Points, Timestamp};
use uuid::Uuid;

use crate::models::leaderboard::{LeaderboardRow, Standing};
use crate::models::metrics::{PlatformMetrics, UserMetrics};
use crate::models::purchase::{InventoryItem, NewPurchase, Purchase, Redemption};
use crate::models::shop_item::ShopItem;
use crate::models::task::Task;
use crate::models::user::UserSummary;
use crate::models::user_task::CompleteTask;

pub mod memory;
pub mod postgres;

pub use memory::MemoryLedger;
pub use postgres::PgLedger;

/// Failure of a ledger operation.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// A deterministic business-rule rejection. Nothing was written.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// The store itself failed; the transaction was rolled back. Callers may
    /// retry the whole request.
    #[error("Transaction failed: {0}")]
    Store(#[from] sqlx::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Outcome of the reward-and-streak transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Reward credited, streak written, progress row upserted.
    Granted { balance: Points, streak: StreakUpdate },
    /// The task was already completed; nothing was written.
    AlreadyCompleted { balance: Points, current_streak: i32 },
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Verify the store is reachable.
    async fn health_check(&self) -> LedgerResult<()>;

    // ── Users ────────────────────────────────────────────────────────

    async fn user_summary(&self, user_id: DbId) -> LedgerResult<Option<UserSummary>>;

    /// All users, newest first.
    async fn list_user_summaries(&self) -> LedgerResult<Vec<UserSummary>>;

    // ── Tasks & progress ─────────────────────────────────────────────

    async fn find_task(&self, task_id: DbId) -> LedgerResult<Option<Task>>;

    /// Tasks of one language partition ordered by `(position, id)`.
    async fn list_tasks(&self, language: &str) -> LedgerResult<Vec<Task>>;

    async fn completed_task_ids(&self, user_id: DbId) -> LedgerResult<HashSet<DbId>>;

    /// Credit the reward, advance the streak, and mark the task completed, as
    /// one transaction. Short-circuits with
    /// [`CompletionOutcome::AlreadyCompleted`] when a progress row exists.
    async fn record_completion(&self, input: &CompleteTask) -> LedgerResult<CompletionOutcome>;

    // ── Shop ─────────────────────────────────────────────────────────

    /// All items ordered by id.
    async fn list_shop_items(&self) -> LedgerResult<Vec<ShopItem>>;

    /// Debit the balance, decrement stock, and record a pending purchase, as
    /// one transaction.
    async fn purchase(&self, input: &NewPurchase) -> LedgerResult<Purchase>;

    /// Transition a purchase from pending to redeemed.
    async fn redeem(&self, purchase_id: Uuid, now: Timestamp) -> LedgerResult<Redemption>;

    /// A user's purchases, newest first.
    async fn inventory(&self, user_id: DbId) -> LedgerResult<Vec<InventoryItem>>;

    // ── Leaderboard ──────────────────────────────────────────────────

    /// The first `limit` users in ranking order.
    async fn top_ranked(&self, limit: i64) -> LedgerResult<Vec<LeaderboardRow>>;

    /// A user's ranking row and the count of users ranked ahead of them.
    async fn standing(&self, user_id: DbId) -> LedgerResult<Option<Standing>>;

    // ── Metrics ──────────────────────────────────────────────────────

    async fn user_metrics(&self, user_id: DbId) -> LedgerResult<Option<UserMetrics>>;

    /// `today` is the UTC day used for "active users today".
    async fn platform_metrics(&self, today: Day) -> LedgerResult<PlatformMetrics>;
}
