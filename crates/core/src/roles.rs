//! Well-known role name constants.
//!
//! These must match the `users.role` column values written by the identity layer.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STUDENT: &str = "student";
