//! Order domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lightning_stores_core::{OrderId, PaymentStatus, Price, ProductId, UserId};

/// One line of an order.
///
/// `unit_price` is the price snapshot taken at checkout; it never changes
/// afterwards, regardless of later edits to the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Price,
}

impl OrderLine {
    /// Subtotal for this line.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.unit_price.line_total(self.quantity)
    }
}

/// An immutable record of a completed checkout. Append-only, never updated
/// or deleted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub lines: Vec<OrderLine>,
    /// Exact sum of line subtotals, computed once at creation.
    pub total_price: Price,
    pub created_at: DateTime<Utc>,
    pub payment_status: PaymentStatus,
}

/// Data required to persist an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub lines: Vec<OrderLine>,
    pub total_price: Price,
    pub payment_status: PaymentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_subtotal() {
        let line = OrderLine {
            product_id: ProductId::new(1),
            quantity: 3,
            unit_price: Price::from_cents(1099),
        };
        assert_eq!(line.subtotal(), Price::from_cents(3297));
    }
}
