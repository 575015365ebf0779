use crate::types::{DbId, Points};

/// Domain-level failures.
///
/// Every business-rule rejection the engine can produce has its own variant so
/// that callers can tell "insufficient funds" apart from "already redeemed"
/// without parsing messages.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Entity not found: {entity} with key {key}")]
    NotFoundByKey { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Task {task_id} is locked")]
    Locked { task_id: DbId },

    #[error("Insufficient balance: have {balance}, need {price}")]
    InsufficientBalance { balance: Points, price: Points },

    #[error("Shop item {item_id} is out of stock")]
    OutOfStock { item_id: DbId },

    #[error("Purchase {purchase_id} was already redeemed")]
    AlreadyRedeemed { purchase_id: String },
}
