//! Order handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use lightning_stores_core::ProductId;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::routes::cart::CheckoutResponse;
use crate::services::checkout::CheckoutService;
use crate::state::AppState;

/// Buy-now request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyNowRequest {
    pub item_id: ProductId,
    /// Defaults to 1 when omitted.
    pub quantity: Option<i32>,
}

/// `POST /api/order/buy_now`
///
/// Orders a single item directly; the user's stored cart is untouched.
#[instrument(skip(state))]
pub async fn buy_now(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(body): Json<BuyNowRequest>,
) -> Result<Json<CheckoutResponse>> {
    let outcome = CheckoutService::new(state.store())
        .buy_now(user_id, body.item_id, body.quantity.unwrap_or(1))
        .await?;

    Ok(Json(CheckoutResponse {
        message: if outcome.cart_pending {
            "Order placed, account update pending"
        } else {
            "Order placed successfully"
        },
        order: outcome.order,
        cart_pending: outcome.cart_pending,
    }))
}
