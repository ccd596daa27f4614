//! User domain types, including the embedded cart.

use serde::{Deserialize, Serialize};

use lightning_stores_core::{Email, OrderId, ProductId, UserId, UserRole};

/// One line of a user's cart: a product reference and a positive quantity.
///
/// A cart holds at most one line per product; repeated adds accumulate into
/// the existing line's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// A storefront user (domain type).
///
/// The user exclusively owns its embedded cart; orders are referenced by id
/// only, since they must outlive cart mutation cycles and stay queryable on
/// their own.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    /// Opaque to everything except the auth service.
    pub password_hash: String,
    pub role: UserRole,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Embedded cart document.
    pub cart: Vec<CartLine>,
    /// Back-references to orders this user has placed.
    pub orders: Vec<OrderId>,
    /// Optimistic-concurrency token for the whole user document. Bumped on
    /// every save; a stale value makes the save report a conflict instead
    /// of silently losing a concurrent cart update.
    pub version: i32,
}

impl User {
    /// Find the cart line for a product, if present.
    #[must_use]
    pub fn cart_line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.cart.iter().find(|line| line.product_id == product_id)
    }

    /// Mutable variant of [`Self::cart_line`].
    pub fn cart_line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.cart
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }
}

/// Data required to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_cart(cart: Vec<CartLine>) -> User {
        User {
            id: UserId::new(1),
            name: "Test".to_owned(),
            email: Email::parse("test@example.com").unwrap(),
            password_hash: String::new(),
            role: UserRole::User,
            address: None,
            phone: None,
            cart,
            orders: Vec::new(),
            version: 0,
        }
    }

    #[test]
    fn test_cart_line_lookup() {
        let mut user = user_with_cart(vec![CartLine {
            product_id: ProductId::new(5),
            quantity: 2,
        }]);

        assert!(user.cart_line(ProductId::new(5)).is_some());
        assert!(user.cart_line(ProductId::new(6)).is_none());

        user.cart_line_mut(ProductId::new(5)).unwrap().quantity = 7;
        assert_eq!(user.cart_line(ProductId::new(5)).unwrap().quantity, 7);
    }
}
