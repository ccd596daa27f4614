//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Readiness check (probes the store)
//!
//! # Auth
//! POST /api/signup                    - Create account, issue token
//! POST /api/login                     - Issue token
//! POST /api/logout                    - Clear token cookie
//! GET  /api/user                      - Current user's profile
//!
//! # Catalog
//! GET  /api/product                   - Full product list
//! GET  /api/product/search?query=     - Search by name/description/company
//!
//! # Cart
//! GET    /api/cart                    - Joined cart lines + display total
//! POST   /api/cart                    - Add item {itemId, quantity}
//! PUT    /api/cart/update/{itemId}    - Overwrite line quantity {quantity}
//! DELETE /api/cart/remove/{itemId}    - Remove line
//! POST   /api/cart/checkout           - Convert cart into an order
//!
//! # Orders
//! POST /api/order/buy_now             - Single-item order, bypasses the cart
//! ```
//!
//! All `/api` routes except signup/login/logout require a bearer token or
//! the `token` cookie (see [`crate::middleware::CurrentUser`]).

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/user", get(users::profile))
}

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/search", get(products::search))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::add))
        .route("/update/{item_id}", put(cart::update))
        .route("/remove/{item_id}", delete(cart::remove))
        .route("/checkout", post(cart::checkout))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/buy_now", post(orders::buy_now))
}

/// Create all `/api` routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .nest("/product", product_routes())
        .nest("/cart", cart_routes())
        .nest("/order", order_routes())
}
