//! Identity primitives.
//!
//! - [`jwt`] -- access-token verification.

pub mod jwt;
