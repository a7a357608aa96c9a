use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::constants::*;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token signing error: {0}")]
    TokenSigning(String),

    #[error("Username already exists")]
    UserAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid bearer token")]
    InvalidToken,

    #[error("Invalid or expired token")]
    Unauthorized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Request rejected: {1}")]
    Rejected(StatusCode, String),
}

impl AppError {
    fn internal(&self) -> (StatusCode, String) {
        tracing::error!("{}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    }
}

/// Implement IntoResponse to convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Database(_)
            | AppError::Transaction(_)
            | AppError::Table(_)
            | AppError::Storage(_)
            | AppError::Commit(_)
            | AppError::Serialization(_)
            | AppError::TaskJoin(_)
            | AppError::PasswordHash(_)
            | AppError::TokenSigning(_) => self.internal(),
            AppError::UserAlreadyExists => (StatusCode::BAD_REQUEST, ERR_USERNAME_TAKEN.into()),
            AppError::UserNotFound => (StatusCode::BAD_REQUEST, ERR_USER_NOT_FOUND.into()),
            AppError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, ERR_INVALID_CREDENTIALS.into())
            }
            AppError::MissingToken => (StatusCode::UNAUTHORIZED, ERR_NO_TOKEN.into()),
            AppError::InvalidToken => (StatusCode::FORBIDDEN, ERR_INVALID_TOKEN.into()),
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, ERR_INVALID_OR_EXPIRED_TOKEN.into())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Rejected(status, msg) => (status, msg),
        };

        let body = Json(json!({
            "message": message
        }));

        (status, body).into_response()
    }
}

/// Syntax and shape problems are validation errors; anything else (body
/// too large, wrong content type) keeps the status axum assigned it
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        match rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                AppError::Validation(rejection.body_text())
            }
            other => AppError::Rejected(other.status(), other.body_text()),
        }
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;
