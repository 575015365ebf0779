//! Ledger transactions against a real PostgreSQL database.
//!
//! `#[sqlx::test]` creates a fresh database per test on the server named by
//! `DATABASE_URL` and applies `db/migrations` to it.

use assert_matches::assert_matches;
use chrono::{Duration, TimeZone, Utc};
use questline_core::error::CoreError;
use questline_core::types::{DbId, Points, Timestamp};
use questline_db::ledger::{CompletionOutcome, LedgerError, LedgerStore, PgLedger};
use questline_db::models::purchase::NewPurchase;
use questline_db::models::shop_item::CreateShopItem;
use questline_db::models::task::{CreateTask, Task};
use questline_db::models::user::CreateUser;
use questline_db::models::user_task::CompleteTask;
use questline_db::repositories::{ShopItemRepo, TaskRepo, UserRepo};
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, username: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            first_name: username.to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_task(pool: &PgPool, position: i32, reward: Points) -> Task {
    TaskRepo::create(
        pool,
        &CreateTask {
            title: format!("Task {position}"),
            description: String::new(),
            task_type: "quiz".to_string(),
            question: "Capital of France?".to_string(),
            options: vec!["Paris".to_string(), "Rome".to_string()],
            correct_answer: "Paris".to_string(),
            questions: Vec::new(),
            reward,
            position,
            language: "ru".to_string(),
        },
    )
    .await
    .unwrap()
}

async fn new_item(pool: &PgPool, price: Points, stock: i32) -> DbId {
    ShopItemRepo::create(
        pool,
        &CreateShopItem {
            name: "Hoodie".to_string(),
            description: String::new(),
            price,
            image: String::new(),
            stock,
        },
    )
    .await
    .unwrap()
    .id
}

fn noon(day: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
}

fn completion(user_id: DbId, task: &Task, now: Timestamp) -> CompleteTask {
    CompleteTask {
        user_id,
        task_id: task.id,
        reward: task.reward,
        now,
    }
}

// ---------------------------------------------------------------------------
// Reward and streak
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn completion_is_granted_once(pool: PgPool) {
    let ledger = PgLedger::new(pool.clone());
    let user_id = new_user(&pool, "ada").await;
    let task = new_task(&pool, 0, 50).await;

    let first = ledger.record_completion(&completion(user_id, &task, noon(10))).await.unwrap();
    assert_matches!(first, CompletionOutcome::Granted { balance: 50, .. });

    let second = ledger.record_completion(&completion(user_id, &task, noon(11))).await.unwrap();
    assert_eq!(
        second,
        CompletionOutcome::AlreadyCompleted {
            balance: 50,
            current_streak: 1
        }
    );

    let user = UserRepo::find_by_id(&pool, user_id).await.unwrap().unwrap();
    assert_eq!(user.balance, 50);
    assert_eq!(user.last_task_date, Some(noon(10).date_naive()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_completions_credit_once(pool: PgPool) {
    let ledger = PgLedger::new(pool.clone());
    let user_id = new_user(&pool, "ada").await;
    let task = new_task(&pool, 0, 50).await;
    let input = completion(user_id, &task, noon(10));

    let (first, second) = tokio::join!(
        ledger.record_completion(&input),
        ledger.record_completion(&input)
    );

    let outcomes = [first.unwrap(), second.unwrap()];
    let granted = outcomes
        .iter()
        .filter(|o| matches!(o, CompletionOutcome::Granted { .. }))
        .count();
    assert_eq!(granted, 1);

    let user = UserRepo::find_by_id(&pool, user_id).await.unwrap().unwrap();
    assert_eq!(user.balance, 50);
    assert_eq!(user.current_streak, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn streak_follows_calendar_days(pool: PgPool) {
    let ledger = PgLedger::new(pool.clone());
    let user_id = new_user(&pool, "ada").await;
    let t0 = new_task(&pool, 0, 10).await;
    let t1 = new_task(&pool, 1, 10).await;
    let t2 = new_task(&pool, 2, 10).await;

    ledger.record_completion(&completion(user_id, &t0, noon(10))).await.unwrap();
    ledger
        .record_completion(&completion(user_id, &t1, noon(10) + Duration::days(1)))
        .await
        .unwrap();
    let outcome = ledger
        .record_completion(&completion(user_id, &t2, noon(10) + Duration::days(4)))
        .await
        .unwrap();

    assert_matches!(outcome, CompletionOutcome::Granted { balance: 30, streak } if streak.streak == 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn completion_for_missing_user_is_rejected(pool: PgPool) {
    let ledger = PgLedger::new(pool.clone());
    let task = new_task(&pool, 0, 10).await;
    let err = ledger.record_completion(&completion(4242, &task, noon(10))).await.unwrap_err();
    assert_matches!(err, LedgerError::Rejected(CoreError::NotFound { entity: "User", .. }));
}

// ---------------------------------------------------------------------------
// Shop
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn buy_then_redeem(pool: PgPool) {
    let ledger = PgLedger::new(pool.clone());
    let user_id = new_user(&pool, "ada").await;
    let task = new_task(&pool, 0, 100).await;
    ledger.record_completion(&completion(user_id, &task, noon(10))).await.unwrap();
    let item_id = new_item(&pool, 60, 1).await;

    let token = Uuid::new_v4();
    let purchase = ledger
        .purchase(&NewPurchase {
            user_id,
            item_id,
            purchase_id: token,
            email: "ada@example.com".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(purchase.purchase_id, token);

    let item = ShopItemRepo::find_by_id(&pool, item_id).await.unwrap().unwrap();
    assert_eq!(item.stock, 0);
    let user = UserRepo::find_by_id(&pool, user_id).await.unwrap().unwrap();
    assert_eq!(user.balance, 40);

    let redemption = ledger.redeem(token, noon(12)).await.unwrap();
    assert_eq!(redemption.user_display_name, "ada");

    let err = ledger.redeem(token, noon(13)).await.unwrap_err();
    assert_matches!(err, LedgerError::Rejected(CoreError::AlreadyRedeemed { .. }));

    let inventory = ledger.inventory(user_id).await.unwrap();
    assert_eq!(inventory.len(), 1);
    assert_eq!(inventory[0].status, "redeemed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_buyers_never_oversell(pool: PgPool) {
    let ledger = PgLedger::new(pool.clone());
    let item_id = new_item(&pool, 10, 1).await;
    let task = new_task(&pool, 0, 10).await;
    let mut users = Vec::new();
    for name in ["a", "b"] {
        let id = new_user(&pool, name).await;
        ledger.record_completion(&completion(id, &task, noon(10))).await.unwrap();
        users.push(id);
    }

    let buy = |user_id: DbId| {
        let ledger = ledger.clone();
        async move {
            ledger
                .purchase(&NewPurchase {
                    user_id,
                    item_id,
                    purchase_id: Uuid::new_v4(),
                    email: "buyer@example.com".to_string(),
                })
                .await
        }
    };
    let (first, second) = tokio::join!(buy(users[0]), buy(users[1]));

    assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);
    let failed = if first.is_err() { first } else { second };
    assert_matches!(failed, Err(LedgerError::Rejected(CoreError::OutOfStock { .. })));

    let item = ShopItemRepo::find_by_id(&pool, item_id).await.unwrap().unwrap();
    assert_eq!(item.stock, 0);
}

// ---------------------------------------------------------------------------
// Leaderboard and metrics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn leaderboard_breaks_ties_on_completed_count(pool: PgPool) {
    let ledger = PgLedger::new(pool.clone());
    let a = new_user(&pool, "a").await;
    let b = new_user(&pool, "b").await;
    let c = new_user(&pool, "c").await;

    // a: 2 x 150, b: 5 x 60, c: 1 x 100.
    let mut position = 0;
    for (user_id, count, reward) in [(a, 2, 150), (b, 5, 60), (c, 1, 100)] {
        for _ in 0..count {
            let task = new_task(&pool, position, reward).await;
            position += 1;
            ledger.record_completion(&completion(user_id, &task, noon(10))).await.unwrap();
        }
    }

    let top = ledger.top_ranked(20).await.unwrap();
    let order: Vec<DbId> = top.iter().map(|r| r.user_id).collect();
    assert_eq!(order, vec![b, a, c]);

    let standing = ledger.standing(a).await.unwrap().unwrap();
    assert_eq!(standing.ahead, 1);
    assert_eq!(standing.row.completed_tasks_count, 2);

    let metrics = ledger.platform_metrics(noon(10).date_naive()).await.unwrap();
    assert_eq!(metrics.total_users, 3);
    assert_eq!(metrics.total_completed_tasks, 8);
    assert_eq!(metrics.active_users_today, 3);
}
