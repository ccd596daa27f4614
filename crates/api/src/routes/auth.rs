//! Signup, login, and logout handlers.
//!
//! Successful signup/login returns the token in the JSON body (for bearer
//! use) and also sets it as an HttpOnly cookie, so both browser and
//! programmatic clients work.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use lightning_stores_core::{Email, UserId, UserRole};

use crate::error::{AppError, Result};
use crate::models::User;
use crate::services::auth::{AuthService, issue_token};
use crate::state::AppState;

/// Signup request body. Fields are optional so missing ones produce a clean
/// 400 instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public view of a user returned from signup/login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: UserRole,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub token: String,
    pub user: UserSummary,
}

/// `POST /api/signup`
#[instrument(skip(state, body))]
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<impl IntoResponse> {
    let (Some(name), Some(email), Some(password)) = (body.name, body.email, body.password)
    else {
        return Err(AppError::BadRequest(
            "Name, email, and password are required".to_owned(),
        ));
    };

    let service = AuthService::new(state.store());
    let user = service.signup(&name, &email, &password).await?;
    let token = issue_token(
        &state.config().jwt_secret,
        user.id,
        state.config().token_ttl_secs,
    )?;

    tracing::info!(user_id = %user.id, "user created");

    Ok((
        StatusCode::CREATED,
        AppendHeaders([(
            SET_COOKIE,
            session_cookie(&token, state.config().token_ttl_secs),
        )]),
        Json(AuthResponse {
            message: "User created successfully",
            token,
            user: UserSummary::from(&user),
        }),
    ))
}

/// `POST /api/login`
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(AppError::BadRequest(
            "Email and password are required".to_owned(),
        ));
    };

    let service = AuthService::new(state.store());
    let user = service.login(&email, &password).await?;
    let token = issue_token(
        &state.config().jwt_secret,
        user.id,
        state.config().token_ttl_secs,
    )?;

    Ok((
        AppendHeaders([(
            SET_COOKIE,
            session_cookie(&token, state.config().token_ttl_secs),
        )]),
        Json(AuthResponse {
            message: "Login successful",
            token,
            user: UserSummary::from(&user),
        }),
    ))
}

/// `POST /api/logout`
pub async fn logout() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, clear_cookie())]),
        Json(serde_json::json!({ "message": "Logout successful" })),
    )
}

/// Build the HttpOnly token cookie.
fn session_cookie(token: &str, ttl_secs: i64) -> String {
    format!("token={token}; HttpOnly; Path=/; Max-Age={ttl_secs}; SameSite=Lax")
}

/// Cookie that immediately expires the token.
fn clear_cookie() -> String {
    "token=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc", 3600);
        assert!(cookie.starts_with("token=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.contains("SameSite=Lax"));
    }

    #[test]
    fn test_clear_cookie_expires() {
        assert!(clear_cookie().contains("Max-Age=0"));
    }
}
