//! Cart service scenarios against the in-memory store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use lightning_stores_api::services::ServiceError;
use lightning_stores_api::services::cart::CartService;
use lightning_stores_core::{Price, ProductId, UserId};
use lightning_stores_integration_tests::MemStore;

const USER: UserId = UserId::new(1);
const PHONE: ProductId = ProductId::new(10);
const LAPTOP: ProductId = ProductId::new(20);

fn store_with_catalog() -> MemStore {
    let store = MemStore::new();
    store.insert_user(1);
    store.insert_product(10, Price::from_cents(699_00), 100);
    store.insert_product(20, Price::from_cents(1299_00), 100);
    store
}

#[tokio::test]
async fn add_accumulates_into_a_single_line() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);

    cart.add_item(USER, PHONE, 1).await.unwrap();
    let lines = cart.add_item(USER, PHONE, 2).await.unwrap();

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].product_id, PHONE);
    assert_eq!(lines[0].quantity, 3);
}

#[tokio::test]
async fn add_keeps_one_line_per_product() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);

    cart.add_item(USER, PHONE, 1).await.unwrap();
    let lines = cart.add_item(USER, LAPTOP, 1).await.unwrap();

    assert_eq!(lines.len(), 2);
}

#[tokio::test]
async fn add_rejects_non_positive_quantity() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);

    for quantity in [0, -3] {
        let err = cart.add_item(USER, PHONE, quantity).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidQuantity(q) if q == quantity));
    }
    assert!(store.user_cart(1).is_empty());
}

#[tokio::test]
async fn add_rejects_accumulation_past_the_quantity_limit() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);

    cart.add_item(USER, PHONE, i32::MAX).await.unwrap();
    let err = cart.add_item(USER, PHONE, 1).await.unwrap_err();

    assert!(matches!(err, ServiceError::InvalidQuantity(1)));
    // The existing line is untouched by the failed add.
    assert_eq!(store.user_cart(1)[0].quantity, i32::MAX);
}

#[tokio::test]
async fn add_unknown_product_fails() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);

    let err = cart.add_item(USER, ProductId::new(999), 1).await.unwrap_err();
    assert!(matches!(err, ServiceError::ProductNotFound(id) if id == ProductId::new(999)));
}

#[tokio::test]
async fn add_unknown_user_fails() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);

    let err = cart.add_item(UserId::new(42), PHONE, 1).await.unwrap_err();
    assert!(matches!(err, ServiceError::UserNotFound));
}

#[tokio::test]
async fn set_quantity_overwrites_instead_of_accumulating() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);

    cart.add_item(USER, PHONE, 5).await.unwrap();
    let lines = cart.set_quantity(USER, PHONE, 2).await.unwrap();

    assert_eq!(lines[0].quantity, 2);
}

#[tokio::test]
async fn set_quantity_below_one_removes_the_line() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);

    cart.add_item(USER, PHONE, 5).await.unwrap();
    let lines = cart.set_quantity(USER, PHONE, 0).await.unwrap();
    assert!(lines.is_empty());

    cart.add_item(USER, PHONE, 5).await.unwrap();
    let lines = cart.set_quantity(USER, PHONE, -4).await.unwrap();
    assert!(lines.is_empty());
}

#[tokio::test]
async fn set_quantity_on_missing_line_fails() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);

    let err = cart.set_quantity(USER, PHONE, 2).await.unwrap_err();
    assert!(matches!(err, ServiceError::LineNotFound(id) if id == PHONE));
}

#[tokio::test]
async fn remove_deletes_only_the_named_line() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);

    cart.add_item(USER, PHONE, 1).await.unwrap();
    cart.add_item(USER, LAPTOP, 1).await.unwrap();
    let lines = cart.remove_item(USER, PHONE).await.unwrap();

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].product_id, LAPTOP);
}

#[tokio::test]
async fn remove_missing_line_fails() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);

    let err = cart.remove_item(USER, PHONE).await.unwrap_err();
    assert!(matches!(err, ServiceError::LineNotFound(id) if id == PHONE));
}

#[tokio::test]
async fn clear_empties_the_cart() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);

    cart.add_item(USER, PHONE, 2).await.unwrap();
    cart.add_item(USER, LAPTOP, 1).await.unwrap();
    cart.clear(USER).await.unwrap();

    assert!(store.user_cart(1).is_empty());
}

#[tokio::test]
async fn get_cart_joins_products_and_sums_exactly() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);

    cart.add_item(USER, PHONE, 2).await.unwrap();
    cart.add_item(USER, LAPTOP, 1).await.unwrap();
    let view = cart.get_cart(USER).await.unwrap();

    assert_eq!(view.items.len(), 2);
    let phone = view
        .items
        .iter()
        .find(|item| item.product_id == PHONE)
        .unwrap();
    assert_eq!(phone.name, "Product 10");
    assert_eq!(phone.unit_price, Price::from_cents(699_00));
    assert_eq!(phone.line_total, Price::from_cents(1398_00));
    // 2 x 699.00 + 1 x 1299.00 = 2697.00
    assert_eq!(view.total, Price::from_cents(2697_00));
}

#[tokio::test]
async fn get_cart_shows_the_current_price_not_the_price_at_add_time() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);

    cart.add_item(USER, PHONE, 1).await.unwrap();
    store.set_product_price(10, Price::from_cents(599_00));
    let view = cart.get_cart(USER).await.unwrap();

    assert_eq!(view.items[0].unit_price, Price::from_cents(599_00));
    assert_eq!(view.total, Price::from_cents(599_00));
}

#[tokio::test]
async fn get_cart_renders_deleted_products_with_a_fallback() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);

    cart.add_item(USER, PHONE, 2).await.unwrap();
    store.remove_product(10);
    let view = cart.get_cart(USER).await.unwrap();

    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].name, "Unknown product");
    assert_eq!(view.items[0].unit_price, Price::ZERO);
    assert_eq!(view.total, Price::ZERO);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_adds_are_not_lost() {
    let store = Arc::new(store_with_catalog());

    let first = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { CartService::new(&*store).add_item(USER, PHONE, 1).await })
    };
    let second = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { CartService::new(&*store).add_item(USER, PHONE, 1).await })
    };
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let lines = store.user_cart(1);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 2);
}

#[tokio::test]
async fn mutation_retries_after_a_version_conflict() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);

    store.force_save_conflicts(2);
    let lines = cart.add_item(USER, PHONE, 1).await.unwrap();

    assert_eq!(lines.len(), 1);
    assert_eq!(store.user_cart(1)[0].quantity, 1);
}

#[tokio::test]
async fn mutation_gives_up_after_repeated_conflicts() {
    let store = store_with_catalog();
    let cart = CartService::new(&store);

    store.force_save_conflicts(usize::MAX);
    let err = cart.add_item(USER, PHONE, 1).await.unwrap_err();

    assert!(matches!(err, ServiceError::Unavailable));
    assert!(store.user_cart(1).is_empty());
}
