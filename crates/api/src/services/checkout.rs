//! Checkout service.
//!
//! Converts either the whole cart or a single ad-hoc item into one immutable
//! order, snapshotting prices at this moment and decrementing stock.
//!
//! Per attempt the flow is: validate -> price -> reserve stock -> persist
//! order -> clear cart / append order reference. Any failure before the
//! order insert aborts with nothing visible (stock reservations are
//! compensated). The order insert deliberately precedes the cart write: a
//! crash between the two leaves an order with an un-cleared cart, which is
//! detectable and recoverable, never a cleared cart with no order.

use tracing::instrument;

use lightning_stores_core::{OrderId, PaymentStatus, Price, ProductId, UserId};

use super::store::Store;
use super::{MAX_SAVE_RETRIES, ServiceError};
use crate::models::{CartLine, NewOrder, Order, OrderLine};

/// Result of a checkout.
///
/// `cart_pending` is the partially-completed case: the order exists but the
/// user-document write (cart clear + order back-reference) kept failing.
/// Callers must report the order as placed and the cleanup as pending, not
/// surface an error, since the order is already committed.
#[derive(Debug)]
pub struct CheckoutOutcome {
    pub order: Order,
    pub cart_pending: bool,
}

/// Checkout operations over any [`Store`] implementation.
pub struct CheckoutService<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> CheckoutService<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Convert the user's entire cart into one order, then clear the cart.
    ///
    /// # Errors
    ///
    /// `UserNotFound`, `EmptyCart`, `ProductNotFound` (any deleted product
    /// aborts the whole checkout), or `OutOfStock`. Re-running after a
    /// successful checkout finds an empty cart and fails with `EmptyCart`
    /// rather than creating a duplicate order.
    #[instrument(skip(self))]
    pub async fn checkout_cart(&self, user_id: UserId) -> Result<CheckoutOutcome, ServiceError> {
        let user = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        if user.cart.is_empty() {
            return Err(ServiceError::EmptyCart);
        }

        let order = self.place_order(user_id, &user.cart).await?;
        let cart_pending = !self.finalize_user(user_id, order.id, true).await;

        Ok(CheckoutOutcome {
            order,
            cart_pending,
        })
    }

    /// Order a single item directly, bypassing the stored cart entirely.
    ///
    /// # Errors
    ///
    /// Same conditions as a one-line cart checkout, plus `InvalidQuantity`
    /// for a non-positive quantity.
    #[instrument(skip(self))]
    pub async fn buy_now(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CheckoutOutcome, ServiceError> {
        if quantity < 1 {
            return Err(ServiceError::InvalidQuantity(quantity));
        }

        self.store
            .find_user_by_id(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        let lines = vec![CartLine {
            product_id,
            quantity,
        }];
        let order = self.place_order(user_id, &lines).await?;
        let cart_pending = !self.finalize_user(user_id, order.id, false).await;

        Ok(CheckoutOutcome {
            order,
            cart_pending,
        })
    }

    /// Validate, price, reserve stock, and persist the order.
    async fn place_order(
        &self,
        user_id: UserId,
        lines: &[CartLine],
    ) -> Result<Order, ServiceError> {
        let priced = self.price_lines(lines).await?;
        self.reserve_all(&priced).await?;

        // Price snapshot takes effect here: the order keeps these unit
        // prices forever, whatever happens to the products later.
        let total_price: Price = priced.iter().map(OrderLine::subtotal).sum();
        let new_order = NewOrder {
            user_id,
            lines: priced.clone(),
            total_price,
            payment_status: PaymentStatus::Pending,
        };

        match self.store.create_order(new_order).await {
            Ok(order) => {
                tracing::info!(%user_id, order_id = %order.id, %total_price, "order persisted");
                Ok(order)
            }
            Err(e) => {
                self.release_all(&priced).await;
                Err(e.into())
            }
        }
    }

    /// Resolve every line against the catalog and freeze unit prices.
    ///
    /// All-or-nothing: one missing product or short stock aborts the whole
    /// checkout rather than silently dropping the line.
    async fn price_lines(&self, lines: &[CartLine]) -> Result<Vec<OrderLine>, ServiceError> {
        let mut priced = Vec::with_capacity(lines.len());
        for line in lines {
            let product = self
                .store
                .find_product_by_id(line.product_id)
                .await?
                .ok_or(ServiceError::ProductNotFound(line.product_id))?;

            if product.stock < line.quantity {
                return Err(ServiceError::OutOfStock(line.product_id));
            }

            priced.push(OrderLine {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: product.price,
            });
        }
        Ok(priced)
    }

    /// Atomically decrement stock for every line, compensating the lines
    /// already taken if a later one fails.
    async fn reserve_all(&self, lines: &[OrderLine]) -> Result<(), ServiceError> {
        let mut taken: Vec<&OrderLine> = Vec::with_capacity(lines.len());
        for line in lines {
            let reserved = match self.store.reserve_stock(line.product_id, line.quantity).await
            {
                Ok(reserved) => reserved,
                Err(e) => {
                    self.release_taken(&taken).await;
                    return Err(e.into());
                }
            };
            if !reserved {
                self.release_taken(&taken).await;
                return Err(ServiceError::OutOfStock(line.product_id));
            }
            taken.push(line);
        }
        Ok(())
    }

    async fn release_all(&self, lines: &[OrderLine]) {
        let taken: Vec<&OrderLine> = lines.iter().collect();
        self.release_taken(&taken).await;
    }

    async fn release_taken(&self, taken: &[&OrderLine]) {
        for line in taken {
            if let Err(e) = self.store.release_stock(line.product_id, line.quantity).await {
                // Stock drift; reconciled out-of-band against order records.
                tracing::error!(
                    product_id = %line.product_id,
                    quantity = line.quantity,
                    error = %e,
                    "failed to release reserved stock"
                );
            }
        }
    }

    /// After the order is persisted: clear the cart (for cart checkouts) and
    /// append the order back-reference, under the usual version CAS.
    ///
    /// Returns `false` when the write could not be completed; the caller
    /// reports the order as placed with cleanup pending.
    async fn finalize_user(&self, user_id: UserId, order_id: OrderId, clear_cart: bool) -> bool {
        for _ in 0..MAX_SAVE_RETRIES {
            let user = self.store.find_user_by_id(user_id).await;
            let Ok(Some(mut user)) = user else { break };

            if clear_cart {
                user.cart.clear();
            }
            user.orders.push(order_id);

            match self.store.save_user(&user).await {
                Ok(true) => return true,
                Ok(false) => {}
                Err(_) => break,
            }
        }

        tracing::error!(
            %user_id,
            %order_id,
            "order persisted but user document update failed; cleanup pending"
        );
        false
    }
}
