//! Narrow data-access surface for the services.
//!
//! The cart, checkout, and auth services talk to storage exclusively through
//! this trait. It carries no business logic; it exists so the services have
//! a small, mockable dependency (the integration-test crate implements it in
//! memory). The production implementation is [`crate::db::PgStore`].

use lightning_stores_core::{Email, ProductId, UserId};

use crate::db::RepositoryError;
use crate::models::{NewOrder, NewUser, Order, Product, User};

/// Access shims over the catalog, account, and order collections.
///
/// `save_user` is a compare-and-swap on the user document's `version`:
/// `Ok(false)` means another writer got there first and the caller must
/// re-read and retry. This is what linearizes concurrent mutations of a
/// single user's cart.
#[allow(async_fn_in_trait)]
pub trait Store: Send + Sync {
    // Account collection
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;
    async fn create_user(&self, new_user: NewUser) -> Result<User, RepositoryError>;
    /// Persist the whole user document if `user.version` is still current.
    async fn save_user(&self, user: &User) -> Result<bool, RepositoryError>;

    // Catalog collection
    async fn find_product_by_id(&self, id: ProductId)
    -> Result<Option<Product>, RepositoryError>;
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;
    async fn search_products(&self, query: &str) -> Result<Vec<Product>, RepositoryError>;
    /// Atomically decrement stock by `quantity` if enough is available.
    /// Returns `Ok(false)` when stock is short; nothing is changed then.
    async fn reserve_stock(
        &self,
        id: ProductId,
        quantity: i32,
    ) -> Result<bool, RepositoryError>;
    /// Give back a reservation taken by [`Self::reserve_stock`] (used to
    /// compensate when a later line of the same checkout fails).
    async fn release_stock(&self, id: ProductId, quantity: i32) -> Result<(), RepositoryError>;

    // Order collection
    async fn create_order(&self, new_order: NewOrder) -> Result<Order, RepositoryError>;
}
