use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::auth::{self, bearer_token, AuthError};
use crate::constants::ERR_TOKEN_REQUIRED;
use crate::error::{AppError, Result};
use crate::models::Credentials;
use crate::routes::AppJson;
use crate::token::Claims;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateTokenRequest {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateTokenResponse {
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    pub decoded: Claims,
}

#[derive(Debug, Serialize)]
pub struct GuestTokenResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// Register a new user
///
/// Returns 400 if the username is already taken.
pub async fn register_user(
    State(state): State<AppState>,
    AppJson(credentials): AppJson<Credentials>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    auth::register(&state, credentials).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// Exchange username and password for a one-day token
pub async fn login_user(
    State(state): State<AppState>,
    AppJson(credentials): AppJson<Credentials>,
) -> Result<Json<LoginResponse>> {
    let token = auth::login(&state, credentials).await?;
    Ok(Json(LoginResponse { token }))
}

/// Check a token from the body (or, failing that, the bearer header)
///
/// 400 when no token is presented, 401 when it does not verify.
pub async fn validate_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<AppJson<ValidateTokenRequest>>,
) -> Result<Json<ValidateTokenResponse>> {
    let from_body = body
        .and_then(|AppJson(req)| req.token)
        .filter(|token| !token.trim().is_empty());
    let token = match from_body.as_deref() {
        Some(token) => Ok(Some(token)),
        None => bearer_token(&headers),
    };

    let decoded = token
        .and_then(|token| auth::validate_token(&state, token))
        .map_err(|e| match e {
            AuthError::MissingToken => AppError::Validation(ERR_TOKEN_REQUIRED.to_string()),
            AuthError::InvalidOrExpired(_) => AppError::Unauthorized,
        })?;

    Ok(Json(ValidateTokenResponse {
        is_valid: true,
        decoded,
    }))
}

/// Issue an anonymous seven-day token
pub async fn guest_token(State(state): State<AppState>) -> Result<Json<GuestTokenResponse>> {
    let access_token = auth::issue_guest_token(&state)?;
    tracing::debug!("Guest token issued");
    Ok(Json(GuestTokenResponse { access_token }))
}
