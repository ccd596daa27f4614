//! Cart service.
//!
//! Maintains the invariant that a user's cart is a deduplicated,
//! positive-quantity list of lines, each referencing an existing product.
//!
//! Every mutation is a read-modify-write cycle over the whole user document,
//! committed with a version compare-and-swap and retried on conflict. That
//! serializes concurrent mutations of one user's cart (two simultaneous adds
//! both land; neither is lost) while operations on different users never
//! contend.
//!
//! Stock is deliberately NOT touched here: a cart line is intent, not a
//! reservation. Inventory only moves at checkout.

use serde::Serialize;
use tracing::instrument;

use lightning_stores_core::{Price, ProductId, UserId};

use super::store::Store;
use super::{MAX_SAVE_RETRIES, ServiceError};
use crate::models::{CartLine, User};

/// One cart line joined with the current product record for display.
///
/// Prices here are read-time and current, not a commitment: the frozen
/// price only exists on order lines.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product_id: ProductId,
    pub quantity: i32,
    pub name: String,
    pub unit_price: Price,
    pub line_total: Price,
    pub image_url: String,
    pub description: String,
}

/// The joined cart with its display total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: Price,
}

/// Cart operations over any [`Store`] implementation.
pub struct CartService<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> CartService<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Add `quantity` of a product to the cart.
    ///
    /// Accumulates into an existing line instead of duplicating it, so the
    /// cart holds at most one line per product. Returns the updated cart.
    ///
    /// # Errors
    ///
    /// `InvalidQuantity` if `quantity < 1` or if the accumulated line
    /// quantity would overflow; `UserNotFound` / `ProductNotFound` if
    /// either side of the reference is missing.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Vec<CartLine>, ServiceError> {
        if quantity < 1 {
            return Err(ServiceError::InvalidQuantity(quantity));
        }

        // Validate the product reference once, outside the retry loop.
        self.store
            .find_product_by_id(product_id)
            .await?
            .ok_or(ServiceError::ProductNotFound(product_id))?;

        self.mutate(user_id, |user| {
            if let Some(line) = user.cart_line_mut(product_id) {
                // Accumulation must not overflow past the quantity >= 1
                // invariant.
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or(ServiceError::InvalidQuantity(quantity))?;
            } else {
                user.cart.push(CartLine {
                    product_id,
                    quantity,
                });
            }
            Ok(())
        })
        .await
    }

    /// Overwrite a line's quantity exactly (not additive).
    ///
    /// A quantity below 1 removes the line: the cart never holds a line
    /// with quantity <= 0.
    ///
    /// # Errors
    ///
    /// `LineNotFound` if the product has no line in the cart.
    #[instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Vec<CartLine>, ServiceError> {
        self.mutate(user_id, |user| {
            if user.cart_line(product_id).is_none() {
                return Err(ServiceError::LineNotFound(product_id));
            }
            if quantity < 1 {
                user.cart.retain(|line| line.product_id != product_id);
            } else if let Some(line) = user.cart_line_mut(product_id) {
                line.quantity = quantity;
            }
            Ok(())
        })
        .await
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// `LineNotFound` if the product has no line in the cart (resolved
    /// design choice: removing an absent line is an error, not a no-op).
    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Vec<CartLine>, ServiceError> {
        self.mutate(user_id, |user| {
            if user.cart_line(product_id).is_none() {
                return Err(ServiceError::LineNotFound(product_id));
            }
            user.cart.retain(|line| line.product_id != product_id);
            Ok(())
        })
        .await
    }

    /// Empty the cart unconditionally.
    #[instrument(skip(self))]
    pub async fn clear(&self, user_id: UserId) -> Result<(), ServiceError> {
        self.mutate(user_id, |user| {
            user.cart.clear();
            Ok(())
        })
        .await?;
        Ok(())
    }

    /// The cart joined with current product data for display.
    ///
    /// A line whose product has been deleted since it was added is kept and
    /// rendered with a fallback name and zero price; checkout of such a
    /// cart aborts instead.
    #[instrument(skip(self))]
    pub async fn get_cart(&self, user_id: UserId) -> Result<CartView, ServiceError> {
        let user = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        let mut items = Vec::with_capacity(user.cart.len());
        for line in &user.cart {
            let product = self.store.find_product_by_id(line.product_id).await?;
            items.push(match product {
                Some(p) => CartItemView {
                    product_id: line.product_id,
                    quantity: line.quantity,
                    name: p.name,
                    unit_price: p.price,
                    line_total: p.price.line_total(line.quantity),
                    image_url: p.image_url,
                    description: p.description,
                },
                None => CartItemView {
                    product_id: line.product_id,
                    quantity: line.quantity,
                    name: "Unknown product".to_owned(),
                    unit_price: Price::ZERO,
                    line_total: Price::ZERO,
                    image_url: String::new(),
                    description: String::new(),
                },
            });
        }

        let total = items.iter().map(|item| item.line_total).sum();
        Ok(CartView { items, total })
    }

    /// Read-modify-CAS cycle shared by all mutations.
    ///
    /// `apply` edits the user document in place; domain errors from it abort
    /// without retrying. A version conflict re-reads and retries up to
    /// [`MAX_SAVE_RETRIES`] times, then reports `Unavailable`.
    async fn mutate<F>(&self, user_id: UserId, apply: F) -> Result<Vec<CartLine>, ServiceError>
    where
        F: Fn(&mut User) -> Result<(), ServiceError>,
    {
        for attempt in 0..MAX_SAVE_RETRIES {
            let mut user = self
                .store
                .find_user_by_id(user_id)
                .await?
                .ok_or(ServiceError::UserNotFound)?;

            apply(&mut user)?;

            if self.store.save_user(&user).await? {
                return Ok(user.cart);
            }
            tracing::debug!(%user_id, attempt, "cart save lost version race, retrying");
        }

        tracing::warn!(%user_id, "cart save exhausted retries");
        Err(ServiceError::Unavailable)
    }
}
