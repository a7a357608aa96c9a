//! Authentication service
//!
//! Registration and login against the credential store, plus issuing and
//! checking signed tokens. Handlers and the bearer middleware both go through
//! here so every token decision uses the same secret and clock.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use thiserror::Error;
use uuid::Uuid;

use crate::db::users;
use crate::error::{AppError, Result};
use crate::models::{Credentials, UserRecord};
use crate::security::{hash_password, verify_password};
use crate::token::{self, Claims, TokenError};
use crate::AppState;

/// Why a presented token was not accepted
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("no token provided")]
    MissingToken,
    #[error("invalid or expired token: {0}")]
    InvalidOrExpired(#[from] TokenError),
}

/// Create a user with a salted password hash
pub async fn register(state: &AppState, credentials: Credentials) -> Result<()> {
    let credentials = credentials.validate().map_err(AppError::Validation)?;
    let username = credentials.username.clone();
    let db = state.db.clone();
    let now = state.clock.now();

    tokio::task::spawn_blocking(move || -> Result<()> {
        // Cheap rejection before paying for the hash; insert_user re-checks atomically
        if users::find_user(&db, &credentials.username)?.is_some() {
            return Err(AppError::UserAlreadyExists);
        }

        let password_hash =
            hash_password(&credentials.password).map_err(AppError::PasswordHash)?;
        let record = UserRecord::new(
            Uuid::new_v4().to_string(),
            credentials.username,
            password_hash,
            now,
        );
        users::insert_user(&db, &record)
    })
    .await??;

    tracing::info!("New user registered: {}", username);
    Ok(())
}

/// Verify credentials and issue a one-day token
pub async fn login(state: &AppState, credentials: Credentials) -> Result<String> {
    let credentials = credentials.validate().map_err(AppError::Validation)?;
    let db = state.db.clone();

    let user = tokio::task::spawn_blocking(move || -> Result<UserRecord> {
        let user = users::find_user(&db, &credentials.username)?.ok_or_else(|| {
            tracing::warn!("Login attempt for unknown user: {}", credentials.username);
            AppError::UserNotFound
        })?;

        if !verify_password(&credentials.password, &user.password_hash)
            .map_err(AppError::PasswordHash)?
        {
            tracing::warn!("Wrong password for user: {}", user.username);
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    })
    .await??;

    let claims = Claims::user(&user.id, &user.username, state.clock.now());
    let token = sign(&claims, state)?;

    tracing::info!("User logged in: {}", user.username);
    Ok(token)
}

/// Anonymous token, no credentials required
pub fn issue_guest_token(state: &AppState) -> Result<String> {
    sign(&Claims::guest(state.clock.now()), state)
}

/// Decode a presented token against the configured secret and current time
pub fn validate_token(
    state: &AppState,
    token: Option<&str>,
) -> std::result::Result<Claims, AuthError> {
    let token = token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)?;

    token::decode(token, &state.config.jwt_secret, state.clock.now()).map_err(|e| {
        tracing::warn!("Token rejected: {}", e);
        AuthError::InvalidOrExpired(e)
    })
}

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// `Ok(None)` when there is no header (or an empty bearer value). A header
/// that is present but not a bearer credential is rejected as malformed
/// rather than treated as absent.
pub fn bearer_token(headers: &HeaderMap) -> std::result::Result<Option<&str>, AuthError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidOrExpired(TokenError::Malformed))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("Bearer") => {
            let token = token.trim();
            Ok((!token.is_empty()).then_some(token))
        }
        _ if value.trim().eq_ignore_ascii_case("Bearer") => Ok(None),
        _ => {
            tracing::warn!("Rejected non-bearer Authorization header");
            Err(AuthError::InvalidOrExpired(TokenError::Malformed))
        }
    }
}

fn sign(claims: &Claims, state: &AppState) -> Result<String> {
    token::encode(claims, &state.config.jwt_secret)
        .map_err(|e| AppError::TokenSigning(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), Ok(None));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Ok(Some("abc.def.ghi")));

        // Scheme is case-insensitive
        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Ok(Some("abc.def.ghi")));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), Ok(None));
    }

    #[test]
    fn test_non_bearer_header_is_malformed() {
        let malformed = Err(AuthError::InvalidOrExpired(TokenError::Malformed));
        let mut headers = HeaderMap::new();

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert_eq!(bearer_token(&headers), malformed);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token abc.def.ghi"));
        assert_eq!(bearer_token(&headers), malformed);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("abc.def.ghi"));
        assert_eq!(bearer_token(&headers), malformed);

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xffabc").unwrap(),
        );
        assert_eq!(bearer_token(&headers), malformed);
    }
}
