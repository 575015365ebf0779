//! Row models and DTOs, one module per table (plus read-side projections).

pub mod leaderboard;
pub mod metrics;
pub mod purchase;
pub mod shop_item;
pub mod task;
pub mod user;
pub mod user_task;
