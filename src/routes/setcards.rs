use axum::{extract::State, http::StatusCode, Extension, Json};

use crate::db::setcards;
use crate::error::Result;
use crate::models::{SetcardInput, SetcardRecord};
use crate::routes::AppJson;
use crate::token::Claims;
use crate::AppState;

/// List every setcard in insertion order
pub async fn list_setcards(State(state): State<AppState>) -> Result<Json<Vec<SetcardRecord>>> {
    let db = state.db.clone();
    let setcards = tokio::task::spawn_blocking(move || setcards::list_setcards(&db)).await??;

    tracing::debug!("Listing {} setcards", setcards.len());
    Ok(Json(setcards))
}

/// Create a setcard
///
/// Requires a bearer token (see [`require_token`](crate::middleware::require_token)).
/// Numeric fields are coerced, photos must be Base64.
pub async fn create_setcard(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(input): AppJson<SetcardInput>,
) -> Result<(StatusCode, Json<SetcardRecord>)> {
    let setcard = input.validate()?;

    let db = state.db.clone();
    let record =
        tokio::task::spawn_blocking(move || setcards::insert_setcard(&db, setcard)).await??;

    tracing::info!(
        "Setcard {} created by {} ({} photos)",
        record.id,
        claims.username.as_deref().unwrap_or("guest"),
        record.photos.len()
    );

    Ok((StatusCode::CREATED, Json(record)))
}
