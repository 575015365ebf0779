//! In-process [`LedgerStore`] used by tests and local tooling.
//!
//! All state sits behind one async mutex. A mutating call works on a staged
//! copy of the state and swaps it in only when the whole operation succeeds,
//! so a rejected or failed call leaves nothing behind.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use questline_core::economy::{check_purchase, display_name, PurchaseStatus, PURCHASE_PENDING, PURCHASE_REDEEMED};
use questline_core::error::CoreError;
use questline_core::roles::ROLE_STUDENT;
use questline_core::streak::{next_streak, utc_day};
use questline_core::types::{DbId, Day, Points, Timestamp};
use sqlx::types::Json;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{CompletionOutcome, LedgerError, LedgerResult, LedgerStore};
use crate::models::leaderboard::{LeaderboardRow, Standing};
use crate::models::metrics::{PlatformMetrics, UserMetrics};
use crate::models::purchase::{InventoryItem, NewPurchase, Purchase, Redemption};
use crate::models::shop_item::{CreateShopItem, ShopItem};
use crate::models::task::{CreateTask, Task};
use crate::models::user::{CreateUser, User, UserSummary};
use crate::models::user_task::{CompleteTask, UserTask, PROGRESS_COMPLETED};

#[derive(Debug, Clone, Default)]
struct State {
    users: BTreeMap<DbId, User>,
    tasks: BTreeMap<DbId, Task>,
    user_tasks: Vec<UserTask>,
    shop_items: BTreeMap<DbId, ShopItem>,
    purchases: Vec<Purchase>,
}

fn next_key<V>(map: &BTreeMap<DbId, V>) -> DbId {
    map.keys().next_back().map_or(1, |last| last + 1)
}

impl State {
    fn completed_count(&self, user_id: DbId) -> i64 {
        self.user_tasks
            .iter()
            .filter(|ut| ut.user_id == user_id && ut.status == PROGRESS_COMPLETED)
            .count() as i64
    }

    fn summary(&self, user: &User) -> UserSummary {
        UserSummary {
            user: user.clone(),
            completed_tasks_count: self.completed_count(user.id),
        }
    }

    fn leaderboard_row(&self, user: &User) -> LeaderboardRow {
        LeaderboardRow {
            user_id: user.id,
            username: user.username.clone(),
            balance: user.balance,
            completed_tasks_count: self.completed_count(user.id),
            current_streak: user.current_streak,
        }
    }

    fn item_price(&self, item_id: DbId) -> Points {
        self.shop_items.get(&item_id).map_or(0, |item| item.price)
    }
}

/// Ledger store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: Mutex<State>,
    fail_next_transaction: AtomicBool,
    unreachable: AtomicBool,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `apply` against a staged copy of the state and commit it on
    /// success.
    async fn transact<T, F>(&self, apply: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut State) -> LedgerResult<T> + Send,
    {
        let mut guard = self.state.lock().await;
        let mut staged = guard.clone();
        let out = apply(&mut staged)?;
        if self.fail_next_transaction.swap(false, Ordering::SeqCst) {
            return Err(LedgerError::Store(sqlx::Error::PoolTimedOut));
        }
        *guard = staged;
        Ok(out)
    }

    /// Make the next mutating call fail with a store error after all of its
    /// writes were staged. The staged writes are discarded.
    pub fn fail_next_transaction(&self) {
        self.fail_next_transaction.store(true, Ordering::SeqCst);
    }

    /// Make `health_check` fail until reset.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    // ── Fixtures ─────────────────────────────────────────────────────

    pub async fn insert_user(&self, input: CreateUser) -> User {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let user = User {
            id: next_key(&state.users),
            telegram_id: input.telegram_id,
            phone_number: input.phone_number,
            username: input.username,
            first_name: input.first_name,
            last_name: input.last_name,
            photo_url: input.photo_url,
            balance: 0,
            current_streak: 0,
            last_task_date: None,
            role: input.role.unwrap_or_else(|| ROLE_STUDENT.to_string()),
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        user
    }

    pub async fn insert_task(&self, input: CreateTask) -> Task {
        let mut state = self.state.lock().await;
        let task = Task {
            id: next_key(&state.tasks),
            title: input.title,
            description: input.description,
            task_type: input.task_type,
            question: input.question,
            options: input.options,
            correct_answer: input.correct_answer,
            questions: Json(input.questions),
            reward: input.reward,
            position: input.position,
            language: input.language,
            created_at: Utc::now(),
        };
        state.tasks.insert(task.id, task.clone());
        task
    }

    /// Delete a task and its progress rows, as the cascading foreign key does.
    pub async fn remove_task(&self, task_id: DbId) -> bool {
        let mut state = self.state.lock().await;
        state.user_tasks.retain(|ut| ut.task_id != task_id);
        state.tasks.remove(&task_id).is_some()
    }

    pub async fn insert_shop_item(&self, input: CreateShopItem) -> ShopItem {
        let mut state = self.state.lock().await;
        let item = ShopItem {
            id: next_key(&state.shop_items),
            name: input.name,
            description: input.description,
            price: input.price,
            image: input.image,
            stock: input.stock,
            created_at: Utc::now(),
        };
        state.shop_items.insert(item.id, item.clone());
        item
    }

    /// Overwrite a user's balance directly.
    pub async fn set_balance(&self, user_id: DbId, balance: Points) -> bool {
        let mut state = self.state.lock().await;
        match state.users.get_mut(&user_id) {
            Some(user) => {
                user.balance = balance;
                true
            }
            None => false,
        }
    }

    pub async fn user(&self, user_id: DbId) -> Option<User> {
        self.state.lock().await.users.get(&user_id).cloned()
    }

    pub async fn shop_item(&self, item_id: DbId) -> Option<ShopItem> {
        self.state.lock().await.shop_items.get(&item_id).cloned()
    }

    pub async fn purchases(&self) -> Vec<Purchase> {
        self.state.lock().await.purchases.clone()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn health_check(&self) -> LedgerResult<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(LedgerError::Store(sqlx::Error::PoolClosed));
        }
        Ok(())
    }

    async fn user_summary(&self, user_id: DbId) -> LedgerResult<Option<UserSummary>> {
        let state = self.state.lock().await;
        Ok(state.users.get(&user_id).map(|u| state.summary(u)))
    }

    async fn list_user_summaries(&self) -> LedgerResult<Vec<UserSummary>> {
        let state = self.state.lock().await;
        let mut users: Vec<&User> = state.users.values().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users.into_iter().map(|u| state.summary(u)).collect())
    }

    async fn find_task(&self, task_id: DbId) -> LedgerResult<Option<Task>> {
        Ok(self.state.lock().await.tasks.get(&task_id).cloned())
    }

    async fn list_tasks(&self, language: &str) -> LedgerResult<Vec<Task>> {
        let state = self.state.lock().await;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|t| t.language == language)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| (t.position, t.id));
        Ok(tasks)
    }

    async fn completed_task_ids(&self, user_id: DbId) -> LedgerResult<HashSet<DbId>> {
        let state = self.state.lock().await;
        Ok(state
            .user_tasks
            .iter()
            .filter(|ut| ut.user_id == user_id && ut.status == PROGRESS_COMPLETED)
            .map(|ut| ut.task_id)
            .collect())
    }

    async fn record_completion(&self, input: &CompleteTask) -> LedgerResult<CompletionOutcome> {
        self.transact(|state| {
            let Some(user) = state.users.get(&input.user_id) else {
                return Err(CoreError::NotFound {
                    entity: "User",
                    id: input.user_id,
                }
                .into());
            };
            if !state.tasks.contains_key(&input.task_id) {
                return Err(CoreError::NotFound {
                    entity: "Task",
                    id: input.task_id,
                }
                .into());
            }

            let existing = state
                .user_tasks
                .iter()
                .position(|ut| ut.user_id == input.user_id && ut.task_id == input.task_id);
            if let Some(idx) = existing {
                if state.user_tasks[idx].status == PROGRESS_COMPLETED {
                    return Ok(CompletionOutcome::AlreadyCompleted {
                        balance: user.balance,
                        current_streak: user.current_streak,
                    });
                }
            }

            let next_id = state.user_tasks.iter().map(|ut| ut.id).max().unwrap_or(0) + 1;
            let user = state
                .users
                .get_mut(&input.user_id)
                .ok_or(CoreError::NotFound {
                    entity: "User",
                    id: input.user_id,
                })?;
            user.balance += input.reward;
            let streak = next_streak(user.last_task_date, utc_day(input.now), user.current_streak);
            user.current_streak = streak.streak;
            user.last_task_date = Some(streak.last_date);
            user.updated_at = input.now;
            let balance = user.balance;

            let row = UserTask {
                id: next_id,
                user_id: input.user_id,
                task_id: input.task_id,
                status: PROGRESS_COMPLETED.to_string(),
                earned: input.reward,
                completed_at: input.now,
            };
            match existing {
                Some(idx) => {
                    let kept_id = state.user_tasks[idx].id;
                    state.user_tasks[idx] = UserTask { id: kept_id, ..row };
                }
                None => state.user_tasks.push(row),
            }

            Ok(CompletionOutcome::Granted { balance, streak })
        })
        .await
    }

    async fn list_shop_items(&self) -> LedgerResult<Vec<ShopItem>> {
        Ok(self.state.lock().await.shop_items.values().cloned().collect())
    }

    async fn purchase(&self, input: &NewPurchase) -> LedgerResult<Purchase> {
        self.transact(|state| {
            let balance = state
                .users
                .get(&input.user_id)
                .map(|u| u.balance)
                .ok_or(CoreError::NotFound {
                    entity: "User",
                    id: input.user_id,
                })?;
            let (price, stock) = state
                .shop_items
                .get(&input.item_id)
                .map(|i| (i.price, i.stock))
                .ok_or(CoreError::NotFound {
                    entity: "ShopItem",
                    id: input.item_id,
                })?;
            check_purchase(balance, price, input.item_id, stock)?;

            if let Some(user) = state.users.get_mut(&input.user_id) {
                user.balance -= price;
            }
            if let Some(item) = state.shop_items.get_mut(&input.item_id) {
                item.stock -= 1;
            }

            let purchase = Purchase {
                id: state.purchases.len() as DbId + 1,
                user_id: input.user_id,
                item_id: input.item_id,
                purchase_id: input.purchase_id,
                status: PURCHASE_PENDING.to_string(),
                email: input.email.trim().to_string(),
                purchased_at: Utc::now(),
                redeemed_at: None,
            };
            state.purchases.push(purchase.clone());
            Ok(purchase)
        })
        .await
    }

    async fn redeem(&self, purchase_id: Uuid, now: Timestamp) -> LedgerResult<Redemption> {
        self.transact(|state| {
            let not_found = || CoreError::NotFoundByKey {
                entity: "Purchase",
                key: purchase_id.to_string(),
            };
            let idx = state
                .purchases
                .iter()
                .position(|p| p.purchase_id == purchase_id)
                .ok_or_else(not_found)?;

            let (user_id, item_id) = {
                let purchase = &state.purchases[idx];
                if purchase.status() == PurchaseStatus::Redeemed {
                    return Err(CoreError::AlreadyRedeemed {
                        purchase_id: purchase_id.to_string(),
                    }
                    .into());
                }
                (purchase.user_id, purchase.item_id)
            };

            let item_name = state
                .shop_items
                .get(&item_id)
                .map(|i| i.name.clone())
                .ok_or_else(not_found)?;
            let user_display_name = state
                .users
                .get(&user_id)
                .map(|u| display_name(&u.first_name, &u.last_name, &u.username))
                .ok_or_else(not_found)?;

            let purchase = &mut state.purchases[idx];
            purchase.status = PURCHASE_REDEEMED.to_string();
            purchase.redeemed_at = Some(now);

            Ok(Redemption {
                purchase_id,
                item_name,
                user_display_name,
                redeemed_at: now,
            })
        })
        .await
    }

    async fn inventory(&self, user_id: DbId) -> LedgerResult<Vec<InventoryItem>> {
        let state = self.state.lock().await;
        let mut owned: Vec<&Purchase> = state
            .purchases
            .iter()
            .filter(|p| p.user_id == user_id)
            .collect();
        owned.sort_by(|a, b| b.purchased_at.cmp(&a.purchased_at).then(b.id.cmp(&a.id)));
        Ok(owned
            .into_iter()
            .map(|p| InventoryItem {
                id: p.id,
                item_id: p.item_id,
                item_name: state
                    .shop_items
                    .get(&p.item_id)
                    .map(|i| i.name.clone())
                    .unwrap_or_default(),
                purchase_id: p.purchase_id,
                status: p.status.clone(),
                purchased_at: p.purchased_at,
            })
            .collect())
    }

    async fn top_ranked(&self, limit: i64) -> LedgerResult<Vec<LeaderboardRow>> {
        let state = self.state.lock().await;
        let mut rows: Vec<LeaderboardRow> = state
            .users
            .values()
            .map(|u| state.leaderboard_row(u))
            .collect();
        rows.sort_by_key(LeaderboardRow::ranking_key);
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn standing(&self, user_id: DbId) -> LedgerResult<Option<Standing>> {
        let state = self.state.lock().await;
        let Some(user) = state.users.get(&user_id) else {
            return Ok(None);
        };
        let row = state.leaderboard_row(user);
        let me = row.ranking_key();
        let ahead = state
            .users
            .values()
            .filter(|other| state.leaderboard_row(other).ranking_key().outranks(&me))
            .count() as i64;
        Ok(Some(Standing { ahead, row }))
    }

    async fn user_metrics(&self, user_id: DbId) -> LedgerResult<Option<UserMetrics>> {
        let state = self.state.lock().await;
        let Some(user) = state.users.get(&user_id) else {
            return Ok(None);
        };
        let total_earned = state
            .user_tasks
            .iter()
            .filter(|ut| ut.user_id == user_id && ut.status == PROGRESS_COMPLETED)
            .map(|ut| ut.earned)
            .sum();
        let owned: Vec<&Purchase> = state
            .purchases
            .iter()
            .filter(|p| p.user_id == user_id)
            .collect();
        Ok(Some(UserMetrics {
            user_id,
            username: user.username.clone(),
            balance: user.balance,
            current_streak: user.current_streak,
            completed_tasks_count: state.completed_count(user_id),
            total_earned,
            total_spent: owned.iter().map(|p| state.item_price(p.item_id)).sum(),
            items_purchased: owned.len() as i64,
            items_redeemed: owned
                .iter()
                .filter(|p| p.status() == PurchaseStatus::Redeemed)
                .count() as i64,
        }))
    }

    async fn platform_metrics(&self, today: Day) -> LedgerResult<PlatformMetrics> {
        let state = self.state.lock().await;
        let active_today: HashSet<DbId> = state
            .user_tasks
            .iter()
            .filter(|ut| utc_day(ut.completed_at) == today)
            .map(|ut| ut.user_id)
            .collect();
        Ok(PlatformMetrics {
            total_users: state.users.len() as i64,
            total_tasks: state.tasks.len() as i64,
            total_completed_tasks: state
                .user_tasks
                .iter()
                .filter(|ut| ut.status == PROGRESS_COMPLETED)
                .count() as i64,
            total_purchases: state.purchases.len() as i64,
            total_revenue: state
                .purchases
                .iter()
                .map(|p| state.item_price(p.item_id))
                .sum(),
            active_users_today: active_today.len() as i64,
        })
    }
}
