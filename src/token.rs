//! Compact JWS tokens (HS256)
//!
//! A token is `base64url(header).base64url(claims).base64url(signature)` where
//! the signature is HMAC-SHA256 over the first two segments, keyed with the
//! process-wide secret. Tokens are stateless: there is no revocation list and
//! no refresh, a token is valid until its `exp` passes.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{GUEST_TOKEN_TTL_SECS, USER_TOKEN_TTL_SECS};
use crate::security::{sign_hmac, verify_hmac};

const ALGORITHM: &str = "HS256";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Decoded token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub guest: bool,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expires at (Unix seconds)
    pub exp: i64,
}

impl Claims {
    /// Claims for a registered user, valid for one day
    pub fn user(id: &str, username: &str, now: i64) -> Self {
        Self {
            id: Some(id.to_string()),
            username: Some(username.to_string()),
            guest: false,
            iat: now,
            exp: now + USER_TOKEN_TTL_SECS,
        }
    }

    /// Anonymous claims, valid for seven days
    pub fn guest(now: i64) -> Self {
        Self {
            id: None,
            username: None,
            guest: true,
            iat: now,
            exp: now + GUEST_TOKEN_TTL_SECS,
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.exp <= now
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("unsupported signing algorithm")]
    UnsupportedAlgorithm,
    #[error("signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Sign claims into a compact token string
pub fn encode(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    let header = Header {
        alg: ALGORITHM.to_string(),
        typ: "JWT".to_string(),
    };
    let header = serde_json::to_vec(&header).map_err(|e| TokenError::Signing(e.to_string()))?;
    let payload = serde_json::to_vec(claims).map_err(|e| TokenError::Signing(e.to_string()))?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header),
        URL_SAFE_NO_PAD.encode(payload)
    );
    let signature = sign_hmac(signing_input.as_bytes(), secret).map_err(TokenError::Signing)?;

    Ok(format!(
        "{}.{}",
        signing_input,
        URL_SAFE_NO_PAD.encode(signature)
    ))
}

/// Verify signature and expiry, returning the decoded claims
pub fn decode(token: &str, secret: &str, now: i64) -> Result<Claims, TokenError> {
    let mut parts = token.trim().split('.');
    let (header_b64, payload_b64, signature_b64) =
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(p), Some(s), None) => (h, p, s),
            _ => return Err(TokenError::Malformed),
        };

    let header: Header = decode_segment(header_b64)?;
    if header.alg != ALGORITHM {
        return Err(TokenError::UnsupportedAlgorithm);
    }

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| TokenError::Malformed)?;
    let signing_input = &token.trim()[..header_b64.len() + 1 + payload_b64.len()];
    if !verify_hmac(signing_input.as_bytes(), &signature, secret) {
        return Err(TokenError::BadSignature);
    }

    let claims: Claims = decode_segment(payload_b64)?;
    if claims.is_expired(now) {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}
