//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use questline_core::types::{DbId, Points, Timestamp};
use questline_db::ledger::MemoryLedger;
use questline_db::models::shop_item::CreateShopItem;
use questline_db::models::task::{CreateTask, Task};
use questline_db::models::user::CreateUser;
use questline_engine::Engine;

/// An engine over a fresh in-memory store, plus direct access to the store
/// for seeding and assertions.
pub struct Harness {
    pub ledger: Arc<MemoryLedger>,
    pub engine: Engine,
}

pub fn harness() -> Harness {
    let ledger = Arc::new(MemoryLedger::new());
    let engine = Engine::new(ledger.clone());
    Harness { ledger, engine }
}

impl Harness {
    pub async fn user(&self, username: &str) -> DbId {
        self.ledger
            .insert_user(CreateUser {
                username: username.to_string(),
                first_name: username.to_string(),
                ..Default::default()
            })
            .await
            .id
    }

    pub async fn user_with_balance(&self, username: &str, balance: Points) -> DbId {
        let id = self.user(username).await;
        self.ledger.set_balance(id, balance).await;
        id
    }

    pub async fn quiz(&self, position: i32, correct_answer: &str, reward: Points) -> Task {
        self.task("quiz", "ru", position, correct_answer, reward).await
    }

    pub async fn survey(&self, position: i32, reward: Points) -> Task {
        self.task("survey", "ru", position, "", reward).await
    }

    pub async fn task(
        &self,
        task_type: &str,
        language: &str,
        position: i32,
        correct_answer: &str,
        reward: Points,
    ) -> Task {
        self.ledger
            .insert_task(CreateTask {
                title: format!("{task_type} #{position}"),
                description: String::new(),
                task_type: task_type.to_string(),
                question: "Which keyword declares a variable?".to_string(),
                options: vec!["var".to_string(), "let".to_string()],
                correct_answer: correct_answer.to_string(),
                questions: Vec::new(),
                reward,
                position,
                language: language.to_string(),
            })
            .await
    }

    pub async fn item(&self, price: Points, stock: i32) -> DbId {
        self.ledger
            .insert_shop_item(CreateShopItem {
                name: "Notebook".to_string(),
                description: "A paper notebook".to_string(),
                price,
                image: String::new(),
                stock,
            })
            .await
            .id
    }

    pub async fn balance(&self, user_id: DbId) -> Points {
        self.ledger.user(user_id).await.map(|u| u.balance).unwrap_or(-1)
    }
}

/// Noon UTC on the given day of March 2025.
pub fn march(day: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
}
