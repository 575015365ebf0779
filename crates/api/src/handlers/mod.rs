pub mod admin;
pub mod leaderboard;
pub mod shop;
pub mod tasks;
pub mod user;
