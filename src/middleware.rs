use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{self, bearer_token, AuthError};
use crate::error::{AppError, Result};
use crate::AppState;

/// Gate a route behind a valid bearer token
///
/// No token is a 401; a malformed header or a token that fails
/// verification is a 403. On success the decoded
/// [`Claims`](crate::token::Claims) are stored in the request extensions
/// for the handler.
pub async fn require_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let claims = bearer_token(request.headers())
        .and_then(|token| auth::validate_token(&state, token))
        .map_err(|e| match e {
            AuthError::MissingToken => AppError::MissingToken,
            AuthError::InvalidOrExpired(_) => AppError::InvalidToken,
        })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
