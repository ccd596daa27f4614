//! Catalog handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::Product;
use crate::services::ServiceError;
use crate::services::store::Store;
use crate::state::AppState;

/// `GET /api/product`
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
) -> Result<Json<Vec<Product>>> {
    let products = state
        .store()
        .list_products()
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(products))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

/// `GET /api/product/search?query=`
///
/// 400 without a query, 404 when nothing matches.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Product>>> {
    let query = params.query.unwrap_or_default();
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::BadRequest("Search query is required".to_owned()));
    }

    let products = state
        .store()
        .search_products(query)
        .await
        .map_err(ServiceError::from)?;

    if products.is_empty() {
        return Err(AppError::NotFound("No products found".to_owned()));
    }

    Ok(Json(products))
}
