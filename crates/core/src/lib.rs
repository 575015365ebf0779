pub mod economy;
pub mod error;
pub mod grading;
pub mod ranking;
pub mod roles;
pub mod sequencing;
pub mod streak;
pub mod types;
