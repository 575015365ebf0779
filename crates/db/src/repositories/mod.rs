//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument. Methods that must be atomic open their
//! own transaction and commit it as their last step; any early return drops
//! the transaction, which rolls it back.

pub mod leaderboard_repo;
pub mod metrics_repo;
pub mod purchase_repo;
pub mod shop_item_repo;
pub mod task_repo;
pub mod user_repo;
pub mod user_task_repo;

pub use leaderboard_repo::LeaderboardRepo;
pub use metrics_repo::MetricsRepo;
pub use purchase_repo::PurchaseRepo;
pub use shop_item_repo::ShopItemRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
pub use user_task_repo::UserTaskRepo;
