//! Cart handlers.
//!
//! Mutations return the raw updated cart lines (the client re-joins via
//! `GET /api/cart` when it needs display data). Cart lines are addressed by
//! product id; there is no separate line id.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use lightning_stores_core::ProductId;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{CartLine, Order};
use crate::services::cart::{CartService, CartView};
use crate::services::checkout::CheckoutService;
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub item_id: ProductId,
    /// Defaults to 1 when omitted.
    pub quantity: Option<i32>,
}

/// Quantity-update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

/// Response for cart mutations.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub message: &'static str,
    pub cart: Vec<CartLine>,
}

/// Response for checkout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub message: &'static str,
    pub order: Order,
    /// True when the order exists but the cart write is still pending
    /// (retried out-of-band); the order itself is fully committed.
    pub cart_pending: bool,
}

/// `GET /api/cart`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<CartView>> {
    let cart = CartService::new(state.store()).get_cart(user_id).await?;
    Ok(Json(cart))
}

/// `POST /api/cart`
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<CartResponse>> {
    let cart = CartService::new(state.store())
        .add_item(user_id, body.item_id, body.quantity.unwrap_or(1))
        .await?;

    Ok(Json(CartResponse {
        message: "Product added to cart successfully",
        cart,
    }))
}

/// `PUT /api/cart/update/{item_id}`
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(item_id): Path<ProductId>,
    Json(body): Json<UpdateQuantityRequest>,
) -> Result<Json<CartResponse>> {
    let cart = CartService::new(state.store())
        .set_quantity(user_id, item_id, body.quantity)
        .await?;

    Ok(Json(CartResponse {
        message: "Item quantity updated successfully",
        cart,
    }))
}

/// `DELETE /api/cart/remove/{item_id}`
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(item_id): Path<ProductId>,
) -> Result<Json<CartResponse>> {
    let cart = CartService::new(state.store())
        .remove_item(user_id, item_id)
        .await?;

    Ok(Json(CartResponse {
        message: "Item removed from cart successfully",
        cart,
    }))
}

/// `POST /api/cart/checkout`
#[instrument(skip(state))]
pub async fn checkout(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<CheckoutResponse>> {
    let outcome = CheckoutService::new(state.store())
        .checkout_cart(user_id)
        .await?;

    Ok(Json(CheckoutResponse {
        message: if outcome.cart_pending {
            "Order placed, cart cleanup pending"
        } else {
            "Order placed successfully"
        },
        order: outcome.order,
        cart_pending: outcome.cart_pending,
    }))
}
