//! Product domain type.

use serde::{Deserialize, Serialize};

use lightning_stores_core::{Price, ProductId};

/// A catalog product.
///
/// Read-mostly: the storefront never mutates products except for the stock
/// decrement performed at checkout. `ram` and `storage` are display-only
/// spec strings (e.g. "8 GB", "256 GB").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub company: String,
    pub description: String,
    pub ram: String,
    pub storage: String,
    pub price: Price,
    /// Units available; never negative (enforced by the store).
    pub stock: i32,
    pub category: String,
    pub image_url: String,
}
