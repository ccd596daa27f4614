//! Business services.
//!
//! - [`cart`] - maintains the invariants of a user's embedded cart
//! - [`checkout`] - converts a cart (or a single buy-now item) into an order
//! - [`auth`] - signup/login and token issue/verify
//! - [`store`] - the narrow data-access trait the services depend on

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod store;

use lightning_stores_core::ProductId;

use crate::db::RepositoryError;

/// How many times a read-modify-write cycle retries after a version
/// conflict before giving up as [`ServiceError::Unavailable`].
pub(crate) const MAX_SAVE_RETRIES: usize = 5;

/// Domain error taxonomy for cart and checkout operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("user not found")]
    UserNotFound,

    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("product {0} is not in the cart")]
    LineNotFound(ProductId),

    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i32),

    #[error("cart is empty")]
    EmptyCart,

    #[error("not enough stock for product {0}")]
    OutOfStock(ProductId),

    /// The store timed out or the operation kept losing version races;
    /// safe to retry.
    #[error("store unavailable, try again")]
    Unavailable,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
