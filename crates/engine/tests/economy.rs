//! Purchases and redemptions.

mod common;

use assert_matches::assert_matches;
use questline_core::economy::PurchaseStatus;
use questline_core::error::CoreError;
use questline_db::LedgerError;

use common::harness;

#[tokio::test]
async fn buy_debits_balance_and_stock() {
    let h = harness();
    let user = h.user_with_balance("ada", 100).await;
    let item = h.item(30, 3).await;

    let purchase = h.engine.economy.buy(user, item, "ada@example.com").await.unwrap();

    assert_eq!(purchase.status(), PurchaseStatus::Pending);
    assert_eq!(h.balance(user).await, 70);
    assert_eq!(h.ledger.shop_item(item).await.unwrap().stock, 2);

    let inventory = h.engine.economy.inventory(user).await.unwrap();
    assert_eq!(inventory.len(), 1);
    assert_eq!(inventory[0].purchase_id, purchase.purchase_id);
    assert_eq!(inventory[0].item_name, "Notebook");
}

#[tokio::test]
async fn insufficient_balance_is_reported_before_stock() {
    let h = harness();
    let user = h.user_with_balance("ada", 10).await;
    let item = h.item(30, 0).await;

    let err = h.engine.economy.buy(user, item, "ada@example.com").await.unwrap_err();
    assert_matches!(
        err,
        LedgerError::Rejected(CoreError::InsufficientBalance { balance: 10, price: 30 })
    );
}

#[tokio::test]
async fn out_of_stock_leaves_balance_alone() {
    let h = harness();
    let user = h.user_with_balance("ada", 100).await;
    let item = h.item(30, 0).await;

    let err = h.engine.economy.buy(user, item, "ada@example.com").await.unwrap_err();
    assert_matches!(err, LedgerError::Rejected(CoreError::OutOfStock { .. }));
    assert_eq!(h.balance(user).await, 100);
}

#[tokio::test]
async fn missing_contact_email_is_rejected() {
    let h = harness();
    let user = h.user_with_balance("ada", 100).await;
    let item = h.item(30, 1).await;

    let err = h.engine.economy.buy(user, item, "  ").await.unwrap_err();
    assert_matches!(err, LedgerError::Rejected(CoreError::Validation(_)));
    assert!(h.ledger.purchases().await.is_empty());
}

#[tokio::test]
async fn unknown_item_is_not_found() {
    let h = harness();
    let user = h.user_with_balance("ada", 100).await;
    let err = h.engine.economy.buy(user, 999, "ada@example.com").await.unwrap_err();
    assert_matches!(err, LedgerError::Rejected(CoreError::NotFound { entity: "ShopItem", .. }));
}

#[tokio::test]
async fn concurrent_buys_with_balance_for_one() {
    let h = harness();
    let user = h.user_with_balance("ada", 30).await;
    let item = h.item(30, 5).await;

    let (first, second) = tokio::join!(
        h.engine.economy.buy(user, item, "ada@example.com"),
        h.engine.economy.buy(user, item, "ada@example.com"),
    );

    let succeeded = [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(succeeded, 1);
    let failure = if first.is_err() { first } else { second };
    assert_matches!(
        failure,
        Err(LedgerError::Rejected(CoreError::InsufficientBalance { .. }))
    );
    assert_eq!(h.balance(user).await, 0);
    assert_eq!(h.ledger.shop_item(item).await.unwrap().stock, 4);
}

#[tokio::test]
async fn last_unit_goes_to_one_buyer() {
    let h = harness();
    let a = h.user_with_balance("a", 100).await;
    let b = h.user_with_balance("b", 100).await;
    let item = h.item(30, 1).await;

    let (first, second) = tokio::join!(
        h.engine.economy.buy(a, item, "a@example.com"),
        h.engine.economy.buy(b, item, "b@example.com"),
    );

    assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);
    assert_eq!(h.ledger.shop_item(item).await.unwrap().stock, 0);
    assert_eq!(h.balance(a).await + h.balance(b).await, 170);
}

#[tokio::test]
async fn redemption_happens_once() {
    let h = harness();
    let user = h.user_with_balance("ada", 100).await;
    let item = h.item(30, 1).await;
    let purchase = h.engine.economy.buy(user, item, "ada@example.com").await.unwrap();
    let token = purchase.purchase_id.to_string();

    let redemption = h.engine.economy.redeem(&token).await.unwrap();
    assert_eq!(redemption.item_name, "Notebook");
    assert_eq!(redemption.user_display_name, "ada");

    let err = h.engine.economy.redeem(&token).await.unwrap_err();
    assert_matches!(err, LedgerError::Rejected(CoreError::AlreadyRedeemed { .. }));

    let inventory = h.engine.economy.inventory(user).await.unwrap();
    assert_eq!(inventory[0].status, "redeemed");
}

#[tokio::test]
async fn malformed_token_is_not_found() {
    let h = harness();
    let err = h.engine.economy.redeem("not-a-uuid").await.unwrap_err();
    assert_matches!(
        err,
        LedgerError::Rejected(CoreError::NotFoundByKey { entity: "Purchase", .. })
    );
}
