//! Aggregate queries for user and platform metrics.

use questline_core::types::{DbId, Day};
use sqlx::PgPool;

use crate::models::metrics::{PlatformMetrics, UserMetrics};

pub struct MetricsRepo;

impl MetricsRepo {
    /// Earning and spending totals for one user.
    ///
    /// `total_spent` sums the price of each purchased item as currently
    /// listed; purchases do not snapshot the price.
    pub async fn user_metrics(pool: &PgPool, user_id: DbId) -> Result<Option<UserMetrics>, sqlx::Error> {
        sqlx::query_as::<_, UserMetrics>(
            "SELECT u.id AS user_id, u.username, u.balance, u.current_streak,
                    (SELECT COUNT(*) FROM user_tasks ut
                     WHERE ut.user_id = u.id AND ut.status = 'completed') AS completed_tasks_count,
                    (SELECT COALESCE(SUM(ut.earned), 0)::BIGINT FROM user_tasks ut
                     WHERE ut.user_id = u.id AND ut.status = 'completed') AS total_earned,
                    (SELECT COALESCE(SUM(i.price), 0)::BIGINT FROM purchases p
                     JOIN shop_items i ON i.id = p.item_id
                     WHERE p.user_id = u.id) AS total_spent,
                    (SELECT COUNT(*) FROM purchases p WHERE p.user_id = u.id) AS items_purchased,
                    (SELECT COUNT(*) FROM purchases p
                     WHERE p.user_id = u.id AND p.status = 'redeemed') AS items_redeemed
             FROM users u
             WHERE u.id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Platform-wide totals. `today` is the UTC day counted as "today".
    pub async fn platform_metrics(pool: &PgPool, today: Day) -> Result<PlatformMetrics, sqlx::Error> {
        sqlx::query_as::<_, PlatformMetrics>(
            "SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM tasks) AS total_tasks,
                (SELECT COUNT(*) FROM user_tasks WHERE status = 'completed') AS total_completed_tasks,
                (SELECT COUNT(*) FROM purchases) AS total_purchases,
                (SELECT COALESCE(SUM(i.price), 0)::BIGINT FROM purchases p
                 JOIN shop_items i ON i.id = p.item_id) AS total_revenue,
                (SELECT COUNT(DISTINCT user_id) FROM user_tasks
                 WHERE (completed_at AT TIME ZONE 'UTC')::date = $1) AS active_users_today",
        )
        .bind(today)
        .fetch_one(pool)
        .await
    }
}
