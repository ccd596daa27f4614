//! Authentication extractor.
//!
//! Every protected route takes a [`CurrentUser`] argument; extraction fails
//! with 401 unless the request carries a valid bearer token, either in the
//! `Authorization` header or in the `token` cookie set at signup/login. The
//! verified user id is the trusted input the services operate on.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use lightning_stores_core::UserId;

use crate::error::AppError;
use crate::services::auth::verify_token;
use crate::state::AppState;

/// Extractor that requires an authenticated user.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     State(state): State<AppState>,
///     CurrentUser(user_id): CurrentUser,
/// ) -> Result<Json<CartView>> {
///     ...
/// }
/// ```
pub struct CurrentUser(pub UserId);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token =
            bearer_token(parts).or_else(|| cookie_token(parts)).ok_or(AppError::Unauthorized)?;

        let user_id = verify_token(&state.config().jwt_secret, &token)
            .map_err(|_| AppError::Unauthorized)?;

        Ok(Self(user_id))
    }
}

/// Token from `Authorization: Bearer <token>`.
fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_owned())
}

/// Token from the `token` cookie.
fn cookie_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    parse_cookie(value, "token")
}

/// Find a cookie by name in a `Cookie` header value.
fn parse_cookie(header_value: &str, name: &str) -> Option<String> {
    header_value.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookie_finds_token() {
        let header = "theme=dark; token=abc.def.ghi; lang=en";
        assert_eq!(parse_cookie(header, "token").as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_parse_cookie_missing() {
        assert_eq!(parse_cookie("theme=dark", "token"), None);
        assert_eq!(parse_cookie("", "token"), None);
    }

    #[test]
    fn test_parse_cookie_no_partial_name_match() {
        let header = "xtoken=nope; token=yes";
        assert_eq!(parse_cookie(header, "token").as_deref(), Some("yes"));
    }
}
