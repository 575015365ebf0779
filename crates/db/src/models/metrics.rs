//! Aggregate metrics projections.

use questline_core::types::{DbId, Points};
use serde::Serialize;
use sqlx::FromRow;

/// Per-user earning and spending totals.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserMetrics {
    pub user_id: DbId,
    pub username: String,
    pub balance: Points,
    pub current_streak: i32,
    pub completed_tasks_count: i64,
    pub total_earned: Points,
    pub total_spent: Points,
    pub items_purchased: i64,
    pub items_redeemed: i64,
}

impl UserMetrics {
    pub fn net_balance(&self) -> Points {
        self.total_earned - self.total_spent
    }
}

/// Platform-wide totals for the admin dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlatformMetrics {
    pub total_users: i64,
    pub total_tasks: i64,
    pub total_completed_tasks: i64,
    pub total_purchases: i64,
    pub total_revenue: Points,
    pub active_users_today: i64,
}

impl PlatformMetrics {
    pub fn avg_tasks_per_user(&self) -> f64 {
        if self.total_users == 0 {
            0.0
        } else {
            self.total_completed_tasks as f64 / self.total_users as f64
        }
    }
}
