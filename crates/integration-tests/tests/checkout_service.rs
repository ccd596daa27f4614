//! Checkout service scenarios against the in-memory store.

#![allow(clippy::unwrap_used)]

use lightning_stores_api::services::ServiceError;
use lightning_stores_api::services::cart::CartService;
use lightning_stores_api::services::checkout::CheckoutService;
use lightning_stores_core::{PaymentStatus, Price, ProductId, UserId};
use lightning_stores_integration_tests::MemStore;

const USER: UserId = UserId::new(1);
const PHONE: ProductId = ProductId::new(10);
const LAPTOP: ProductId = ProductId::new(20);
const EARBUDS: ProductId = ProductId::new(30);

fn store_with_catalog() -> MemStore {
    let store = MemStore::new();
    store.insert_user(1);
    store.insert_product(10, Price::from_cents(10_00), 50);
    store.insert_product(20, Price::from_cents(19_99), 4);
    store.insert_product(30, Price::from_cents(0_01), 10);
    store
}

#[tokio::test]
async fn checkout_places_an_order_and_clears_the_cart() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);
    let checkout = CheckoutService::new(&store);

    cart.add_item(USER, PHONE, 2).await.unwrap();
    let outcome = checkout.checkout_cart(USER).await.unwrap();

    assert!(!outcome.cart_pending);
    assert_eq!(outcome.order.total_price, Price::from_cents(20_00));
    assert_eq!(outcome.order.lines.len(), 1);
    assert_eq!(outcome.order.lines[0].unit_price, Price::from_cents(10_00));
    assert_eq!(outcome.order.payment_status, PaymentStatus::Pending);

    assert!(store.user_cart(1).is_empty());
    assert_eq!(store.user_orders(1), vec![outcome.order.id]);
    assert_eq!(store.product_stock(10), 48);
}

#[tokio::test]
async fn order_prices_are_frozen_at_checkout() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);
    let checkout = CheckoutService::new(&store);

    cart.add_item(USER, PHONE, 1).await.unwrap();
    let outcome = checkout.checkout_cart(USER).await.unwrap();

    store.set_product_price(10, Price::from_cents(25_00));

    let order = store.get_order(outcome.order.id).unwrap();
    assert_eq!(order.lines[0].unit_price, Price::from_cents(10_00));
    assert_eq!(order.total_price, Price::from_cents(10_00));
}

#[tokio::test]
async fn multi_line_totals_are_exact() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);
    let checkout = CheckoutService::new(&store);

    cart.add_item(USER, LAPTOP, 3).await.unwrap();
    cart.add_item(USER, EARBUDS, 1).await.unwrap();
    let outcome = checkout.checkout_cart(USER).await.unwrap();

    // 3 x 19.99 + 1 x 0.01 = 59.98, with no floating-point drift
    assert_eq!(outcome.order.total_price, Price::from_cents(59_98));
}

#[tokio::test]
async fn checkout_of_an_empty_cart_fails_without_an_order() {
    let store = store_with_catalog();
    let checkout = CheckoutService::new(&store);

    let err = checkout.checkout_cart(USER).await.unwrap_err();

    assert!(matches!(err, ServiceError::EmptyCart));
    assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn repeating_a_checkout_does_not_duplicate_the_order() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);
    let checkout = CheckoutService::new(&store);

    cart.add_item(USER, PHONE, 1).await.unwrap();
    checkout.checkout_cart(USER).await.unwrap();
    let err = checkout.checkout_cart(USER).await.unwrap_err();

    assert!(matches!(err, ServiceError::EmptyCart));
    assert_eq!(store.order_count(), 1);
    assert_eq!(store.product_stock(10), 49);
}

#[tokio::test]
async fn a_deleted_product_aborts_the_whole_checkout() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);
    let checkout = CheckoutService::new(&store);

    cart.add_item(USER, PHONE, 1).await.unwrap();
    cart.add_item(USER, LAPTOP, 1).await.unwrap();
    store.remove_product(20);

    let err = checkout.checkout_cart(USER).await.unwrap_err();

    assert!(matches!(err, ServiceError::ProductNotFound(id) if id == LAPTOP));
    assert_eq!(store.order_count(), 0);
    assert_eq!(store.product_stock(10), 50);
    assert_eq!(store.user_cart(1).len(), 2);
}

#[tokio::test]
async fn short_stock_aborts_without_touching_inventory() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);
    let checkout = CheckoutService::new(&store);

    cart.add_item(USER, PHONE, 2).await.unwrap();
    cart.add_item(USER, LAPTOP, 5).await.unwrap(); // only 4 in stock

    let err = checkout.checkout_cart(USER).await.unwrap_err();

    assert!(matches!(err, ServiceError::OutOfStock(id) if id == LAPTOP));
    assert_eq!(store.order_count(), 0);
    assert_eq!(store.product_stock(10), 50);
    assert_eq!(store.product_stock(20), 4);
    assert_eq!(store.user_cart(1).len(), 2);
}

#[tokio::test]
async fn buy_now_leaves_the_stored_cart_untouched() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);
    let checkout = CheckoutService::new(&store);

    cart.add_item(USER, PHONE, 3).await.unwrap();
    let outcome = checkout.buy_now(USER, LAPTOP, 1).await.unwrap();

    assert!(!outcome.cart_pending);
    assert_eq!(outcome.order.lines.len(), 1);
    assert_eq!(outcome.order.lines[0].product_id, LAPTOP);
    assert_eq!(outcome.order.total_price, Price::from_cents(19_99));

    let lines = store.user_cart(1);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].product_id, PHONE);
    assert_eq!(lines[0].quantity, 3);

    assert_eq!(store.user_orders(1), vec![outcome.order.id]);
    assert_eq!(store.product_stock(20), 3);
}

#[tokio::test]
async fn buy_now_rejects_non_positive_quantity() {
    let store = store_with_catalog();
    let checkout = CheckoutService::new(&store);

    let err = checkout.buy_now(USER, PHONE, 0).await.unwrap_err();

    assert!(matches!(err, ServiceError::InvalidQuantity(0)));
    assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn buy_now_for_an_unknown_user_fails() {
    let store = store_with_catalog();
    let checkout = CheckoutService::new(&store);

    let err = checkout.buy_now(UserId::new(42), PHONE, 1).await.unwrap_err();

    assert!(matches!(err, ServiceError::UserNotFound));
    assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn buy_now_respects_stock() {
    let store = store_with_catalog();
    let checkout = CheckoutService::new(&store);

    let err = checkout.buy_now(USER, LAPTOP, 5).await.unwrap_err();

    assert!(matches!(err, ServiceError::OutOfStock(id) if id == LAPTOP));
    assert_eq!(store.product_stock(20), 4);
}

#[tokio::test]
async fn a_failed_cart_clear_still_reports_the_order() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);
    let checkout = CheckoutService::new(&store);

    cart.add_item(USER, PHONE, 2).await.unwrap();
    store.fail_user_saves(true);
    let outcome = checkout.checkout_cart(USER).await.unwrap();

    // The order is committed; only the user-document cleanup is pending.
    assert!(outcome.cart_pending);
    assert!(store.get_order(outcome.order.id).is_some());
    assert_eq!(store.product_stock(10), 48);
    assert_eq!(store.user_cart(1).len(), 1);
    assert!(store.user_orders(1).is_empty());
}
