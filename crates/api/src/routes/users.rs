//! Profile handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use lightning_stores_core::{Email, OrderId, UserId, UserRole};

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{CartLine, User};
use crate::services::ServiceError;
use crate::services::store::Store;
use crate::state::AppState;

/// Profile view: the user document minus the password hash and the
/// concurrency bookkeeping.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: UserRole,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub cart: Vec<CartLine>,
    pub orders: Vec<OrderId>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            address: user.address,
            phone: user.phone,
            cart: user.cart,
            orders: user.orders,
        }
    }
}

/// `GET /api/user`
#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<UserProfile>> {
    let user = state
        .store()
        .find_user_by_id(user_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::UserNotFound)?;

    Ok(Json(UserProfile::from(user)))
}
