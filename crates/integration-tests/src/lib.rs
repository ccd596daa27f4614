//! Test support for Lightning Stores.
//!
//! [`MemStore`] implements the API's `Store` trait in memory with the same
//! observable semantics as the Postgres implementation: version
//! compare-and-swap on user saves and conditional stock decrements. Fault
//! injection knobs let tests exercise the retry and partial-completion
//! paths deterministically.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use lightning_stores_api::db::RepositoryError;
use lightning_stores_api::models::{CartLine, NewOrder, NewUser, Order, Product, User};
use lightning_stores_api::services::store::Store;
use lightning_stores_core::{Email, OrderId, Price, ProductId, UserId, UserRole};

#[derive(Default)]
struct Inner {
    users: HashMap<i32, User>,
    products: HashMap<i32, Product>,
    orders: HashMap<i32, Order>,
    next_user_id: i32,
    next_order_id: i32,
}

/// In-memory store with CAS semantics and fault injection.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
    /// When set, every `save_user` fails with a timeout.
    fail_user_saves: AtomicBool,
    /// Forces the next N `save_user` calls to report a version conflict
    /// without applying anything.
    conflict_next_saves: AtomicUsize,
}

impl MemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Fixtures
    // =========================================================================

    /// Insert a user with an empty cart and no orders.
    pub fn insert_user(&self, id: i32) {
        let mut inner = self.inner.lock().unwrap();
        inner.next_user_id = inner.next_user_id.max(id + 1);
        inner.users.insert(
            id,
            User {
                id: UserId::new(id),
                name: format!("User {id}"),
                email: Email::parse(&format!("user{id}@example.com")).unwrap(),
                password_hash: String::new(),
                role: UserRole::User,
                address: None,
                phone: None,
                cart: Vec::new(),
                orders: Vec::new(),
                version: 0,
            },
        );
    }

    /// Insert a product with the given price and stock.
    pub fn insert_product(&self, id: i32, price: Price, stock: i32) {
        self.inner.lock().unwrap().products.insert(
            id,
            Product {
                id: ProductId::new(id),
                name: format!("Product {id}"),
                company: "Testco".to_owned(),
                description: "A test product".to_owned(),
                ram: "8 GB".to_owned(),
                storage: "128 GB".to_owned(),
                price,
                stock,
                category: "Test".to_owned(),
                image_url: format!("/images/{id}.webp"),
            },
        );
    }

    pub fn set_product_price(&self, id: i32, price: Price) {
        if let Some(product) = self.inner.lock().unwrap().products.get_mut(&id) {
            product.price = price;
        }
    }

    pub fn remove_product(&self, id: i32) {
        self.inner.lock().unwrap().products.remove(&id);
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    #[must_use]
    pub fn user_cart(&self, id: i32) -> Vec<CartLine> {
        self.inner.lock().unwrap().users.get(&id).unwrap().cart.clone()
    }

    #[must_use]
    pub fn user_orders(&self, id: i32) -> Vec<OrderId> {
        self.inner.lock().unwrap().users.get(&id).unwrap().orders.clone()
    }

    #[must_use]
    pub fn product_stock(&self, id: i32) -> i32 {
        self.inner.lock().unwrap().products.get(&id).unwrap().stock
    }

    #[must_use]
    pub fn order_count(&self) -> usize {
        self.inner.lock().unwrap().orders.len()
    }

    #[must_use]
    pub fn get_order(&self, id: OrderId) -> Option<Order> {
        self.inner.lock().unwrap().orders.get(&id.as_i32()).cloned()
    }

    // =========================================================================
    // Fault injection
    // =========================================================================

    pub fn fail_user_saves(&self, fail: bool) {
        self.fail_user_saves.store(fail, Ordering::SeqCst);
    }

    pub fn force_save_conflicts(&self, count: usize) {
        self.conflict_next_saves.store(count, Ordering::SeqCst);
    }
}

impl Store for MemStore {
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.inner.lock().unwrap().users.get(&id.as_i32()).cloned())
    }

    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .values()
            .find(|user| user.email == *email)
            .cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.values().any(|u| u.email == new_user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        let id = inner.next_user_id.max(1);
        inner.next_user_id = id + 1;
        let user = User {
            id: UserId::new(id),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            address: None,
            phone: None,
            cart: Vec::new(),
            orders: Vec::new(),
            version: 0,
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn save_user(&self, user: &User) -> Result<bool, RepositoryError> {
        if self.fail_user_saves.load(Ordering::SeqCst) {
            return Err(RepositoryError::Timeout);
        }
        if self
            .conflict_next_saves
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Ok(false);
        }

        let mut inner = self.inner.lock().unwrap();
        let Some(current) = inner.users.get_mut(&user.id.as_i32()) else {
            return Ok(false);
        };
        if current.version != user.version {
            return Ok(false);
        }
        let mut updated = user.clone();
        updated.version += 1;
        *current = updated;
        Ok(true)
    }

    async fn find_product_by_id(
        &self,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .products
            .get(&id.as_i32())
            .cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let mut products: Vec<Product> =
            self.inner.lock().unwrap().products.values().cloned().collect();
        products.sort_by_key(|p| p.id.as_i32());
        Ok(products)
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
        let needle = query.to_lowercase();
        let mut products: Vec<Product> = self
            .inner
            .lock()
            .unwrap()
            .products
            .values()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
                    || p.company.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        products.sort_by_key(|p| p.id.as_i32());
        Ok(products)
    }

    async fn reserve_stock(&self, id: ProductId, quantity: i32) -> Result<bool, RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.products.get_mut(&id.as_i32()) {
            Some(product) if product.stock >= quantity => {
                product.stock -= quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release_stock(&self, id: ProductId, quantity: i32) -> Result<(), RepositoryError> {
        if let Some(product) = self.inner.lock().unwrap().products.get_mut(&id.as_i32()) {
            product.stock += quantity;
        }
        Ok(())
    }

    async fn create_order(&self, new_order: NewOrder) -> Result<Order, RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_order_id.max(1);
        inner.next_order_id = id + 1;
        let order = Order {
            id: OrderId::new(id),
            user_id: new_order.user_id,
            lines: new_order.lines,
            total_price: new_order.total_price,
            created_at: chrono::Utc::now(),
            payment_status: new_order.payment_status,
        };
        inner.orders.insert(id, order.clone());
        Ok(order)
    }
}
