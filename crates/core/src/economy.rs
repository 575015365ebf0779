//! Shop purchase rules.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Points};

/// Purchase status value before fulfilment.
pub const PURCHASE_PENDING: &str = "pending";
/// Purchase status value after an admin confirmed fulfilment.
pub const PURCHASE_REDEEMED: &str = "redeemed";

/// Lifecycle of a purchase. Only `Pending -> Redeemed` is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    Pending,
    Redeemed,
}

impl PurchaseStatus {
    pub fn from_db(status: &str) -> Self {
        match status {
            PURCHASE_REDEEMED => Self::Redeemed,
            _ => Self::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => PURCHASE_PENDING,
            Self::Redeemed => PURCHASE_REDEEMED,
        }
    }
}

/// Check the purchase preconditions in their reporting order: balance first,
/// then stock.
pub fn check_purchase(balance: Points, price: Points, item_id: DbId, stock: i32) -> Result<(), CoreError> {
    if balance < price {
        return Err(CoreError::InsufficientBalance { balance, price });
    }
    if stock <= 0 {
        return Err(CoreError::OutOfStock { item_id });
    }
    Ok(())
}

/// Validate the contact email a purchase is fulfilled to.
pub fn validate_contact_email(email: &str) -> Result<(), CoreError> {
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(CoreError::Validation(
            "A valid contact email is required".into(),
        )),
    }
}

/// Name shown to admins when redeeming: first and last name, or the
/// username when no first name is on record.
pub fn display_name(first_name: &str, last_name: &str, username: &str) -> String {
    if first_name.is_empty() {
        return username.to_string();
    }
    if last_name.is_empty() {
        first_name.to_string()
    } else {
        format!("{first_name} {last_name}")
    }
}
