//! Authentication service.
//!
//! Signup and login with argon2 password hashing, plus issue/verify of the
//! HS256 bearer token the API authenticates every request with. The cart and
//! checkout services never see any of this; they receive an already-verified
//! [`UserId`].

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use lightning_stores_core::{Email, UserId, UserRole};

use crate::db::RepositoryError;
use crate::models::{NewUser, User};
use crate::services::store::Store;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// JWT claims carried by the bearer token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id.
    sub: i32,
    /// Issued-at (seconds since epoch).
    iat: i64,
    /// Expiry (seconds since epoch).
    exp: i64,
}

/// Signup/login over any [`Store`] implementation.
pub struct AuthService<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> AuthService<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Register a new user with name, email, and password.
    ///
    /// # Errors
    ///
    /// `InvalidEmail`, `WeakPassword`, or `UserAlreadyExists`.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .store
            .create_user(NewUser {
                name: name.to_owned(),
                email,
                password_hash,
                role: UserRole::User,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for an unknown email or a wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        Ok(user)
    }
}

/// Reject passwords that don't meet the minimum requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with argon2 and a fresh salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Verify a password against a stored argon2 hash.
fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::Hashing(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Issue a signed bearer token for a user.
///
/// # Errors
///
/// Returns `InvalidToken` if signing fails (malformed key material).
pub fn issue_token(
    secret: &SecretString,
    user_id: UserId,
    ttl_secs: i64,
) -> Result<String, AuthError> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.as_i32(),
        iat: now,
        exp: now + ttl_secs,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Verify a bearer token and extract the user id it was issued for.
///
/// # Errors
///
/// Returns `InvalidToken` for anything wrong with the token, including
/// expiry.
pub fn verify_token(secret: &SecretString, token: &str) -> Result<UserId, AuthError> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AuthError::InvalidToken)?;

    Ok(UserId::new(data.claims.sub))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("a-test-signing-key-of-decent-length")
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_weak_password_rejected() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_token_roundtrip() {
        let token = issue_token(&secret(), UserId::new(42), 3600).unwrap();
        let user_id = verify_token(&secret(), &token).unwrap();
        assert_eq!(user_id, UserId::new(42));
    }

    #[test]
    fn test_token_wrong_secret_rejected() {
        let token = issue_token(&secret(), UserId::new(42), 3600).unwrap();
        let other = SecretString::from("a-different-signing-key-entirely");
        assert!(matches!(
            verify_token(&other, &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = issue_token(&secret(), UserId::new(42), -120).unwrap();
        assert!(matches!(
            verify_token(&secret(), &token),
            Err(AuthError::InvalidToken)
        ));
    }
}
