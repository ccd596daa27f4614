//! `PostgreSQL` implementation of the [`Store`] access shims.
//!
//! The user row is treated as a document: the embedded cart and the order
//! back-references live in JSONB columns and the whole row is written back
//! under a `version` compare-and-swap, the way a document store would do a
//! conditional replace.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use lightning_stores_core::{Email, OrderId, PaymentStatus, Price, ProductId, UserId, UserRole};

use super::{RepositoryError, with_timeout};
use crate::models::{CartLine, NewOrder, NewUser, Order, Product, User};
use crate::services::store::Store;

/// Production store backed by a `PgPool`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgStore {
    /// Create a store over an existing pool. `timeout` bounds every
    /// individual query.
    #[must_use]
    pub const fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// The underlying pool (used by the readiness probe).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// =============================================================================
// Row types
// =============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    address: Option<String>,
    phone: Option<String>,
    cart: Json<Vec<CartLine>>,
    orders: Json<Vec<OrderId>>,
    version: i32,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role = UserRole::from_str(&row.role)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        Ok(Self {
            id: UserId::new(row.id),
            name: row.name,
            email,
            password_hash: row.password_hash,
            role,
            address: row.address,
            phone: row.phone,
            cart: row.cart.0,
            orders: row.orders.0,
            version: row.version,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    company: String,
    description: String,
    ram: String,
    storage: String,
    price: Decimal,
    stock: i32,
    category: String,
    image_url: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            company: row.company,
            description: row.description,
            ram: row.ram,
            storage: row.storage,
            price: Price::new(row.price),
            stock: row.stock,
            category: row.category,
            image_url: row.image_url,
        }
    }
}

#[derive(sqlx::FromRow)]
struct InsertedOrderRow {
    id: i32,
    created_at: DateTime<Utc>,
    payment_status: String,
}

const SELECT_USER: &str = "SELECT id, name, email, password_hash, role, address, phone, \
                           cart, orders, version FROM users";

const SELECT_PRODUCT: &str = "SELECT id, name, company, description, ram, storage, price, \
                              stock, category, image_url FROM products";

/// Escape `LIKE`/`ILIKE` metacharacters so user input matches literally
/// instead of acting as a wildcard pattern.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// =============================================================================
// Store implementation
// =============================================================================

impl Store for PgStore {
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = with_timeout(
            self.timeout,
            sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = with_timeout(
            self.timeout,
            sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE email = $1"))
                .bind(email.as_str())
                .fetch_optional(&self.pool),
        )
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let result = with_timeout(
            self.timeout,
            sqlx::query_as::<_, UserRow>(
                "INSERT INTO users (name, email, password_hash, role) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, name, email, password_hash, role, address, phone, \
                           cart, orders, version",
            )
            .bind(&new_user.name)
            .bind(new_user.email.as_str())
            .bind(&new_user.password_hash)
            .bind(new_user.role.as_str())
            .fetch_one(&self.pool),
        )
        .await;

        let row = result.map_err(|e| {
            if let RepositoryError::Database(sqlx::Error::Database(ref db_err)) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            e
        })?;

        User::try_from(row)
    }

    async fn save_user(&self, user: &User) -> Result<bool, RepositoryError> {
        let result = with_timeout(
            self.timeout,
            sqlx::query(
                "UPDATE users SET name = $2, email = $3, password_hash = $4, role = $5, \
                 address = $6, phone = $7, cart = $8, orders = $9, version = version + 1 \
                 WHERE id = $1 AND version = $10",
            )
            .bind(user.id)
            .bind(&user.name)
            .bind(user.email.as_str())
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(&user.address)
            .bind(&user.phone)
            .bind(Json(&user.cart))
            .bind(Json(&user.orders))
            .bind(user.version)
            .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_product_by_id(
        &self,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = with_timeout(
            self.timeout,
            sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await?;

        Ok(row.map(Product::from))
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = with_timeout(
            self.timeout,
            sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} ORDER BY id"))
                .fetch_all(&self.pool),
        )
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
        let pattern = format!("%{}%", escape_like(query));
        let rows = with_timeout(
            self.timeout,
            sqlx::query_as::<_, ProductRow>(&format!(
                "{SELECT_PRODUCT} \
                 WHERE name ILIKE $1 OR description ILIKE $1 OR company ILIKE $1 \
                 ORDER BY id"
            ))
            .bind(&pattern)
            .fetch_all(&self.pool),
        )
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn reserve_stock(&self, id: ProductId, quantity: i32) -> Result<bool, RepositoryError> {
        // Conditional decrement: a concurrent checkout can't drive stock
        // negative because the guard and the write are one statement.
        let result = with_timeout(
            self.timeout,
            sqlx::query("UPDATE products SET stock = stock - $2 WHERE id = $1 AND stock >= $2")
                .bind(id)
                .bind(quantity)
                .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn release_stock(&self, id: ProductId, quantity: i32) -> Result<(), RepositoryError> {
        with_timeout(
            self.timeout,
            sqlx::query("UPDATE products SET stock = stock + $2 WHERE id = $1")
                .bind(id)
                .bind(quantity)
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn create_order(&self, new_order: NewOrder) -> Result<Order, RepositoryError> {
        let row = with_timeout(
            self.timeout,
            sqlx::query_as::<_, InsertedOrderRow>(
                "INSERT INTO orders (user_id, lines, total_price, payment_status) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, created_at, payment_status",
            )
            .bind(new_order.user_id)
            .bind(Json(&new_order.lines))
            .bind(new_order.total_price.amount())
            .bind(new_order.payment_status.as_str())
            .fetch_one(&self.pool),
        )
        .await?;

        let payment_status = PaymentStatus::from_str(&row.payment_status)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        Ok(Order {
            id: OrderId::new(row.id),
            user_id: new_order.user_id,
            lines: new_order.lines,
            total_price: new_order.total_price,
            created_at: row.created_at,
            payment_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("volt one"), "volt one");
    }
}
