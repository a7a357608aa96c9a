use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON body extractor whose rejections become [`AppError::Validation`]
///
/// Plain `axum::Json` answers malformed bodies with a text/plain 4xx; this
/// keeps every failure in the `{"message": ...}` shape.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
