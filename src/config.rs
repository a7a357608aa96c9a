use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_MAX_BODY_BYTES, INSECURE_DEFAULT_SECRET};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_path: String,
    pub models_dir: PathBuf,
    /// Empty means any origin is allowed
    pub allowed_origins: Vec<String>,
    pub max_body_bytes: usize,
    pub environment: String,
    pub jwt_secret: String,
    pub log_requests: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| "Invalid PORT")?;

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/arutti.db".to_string());

        let models_dir = env::var("MODELS_DIR")
            .unwrap_or_else(|_| "./models".to_string())
            .into();

        let allowed_origins = parse_origins(
            &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        let max_body_bytes = match env::var("MAX_BODY_BYTES") {
            Ok(raw) => raw.parse().map_err(|_| "Invalid MAX_BODY_BYTES")?,
            Err(_) => DEFAULT_MAX_BODY_BYTES,
        };

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET is not set, falling back to an insecure default");
                INSECURE_DEFAULT_SECRET.to_string()
            }
        };

        let log_requests = env::var("LOG_REQUESTS")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Config {
            server_host,
            server_port,
            database_path,
            models_dir,
            allowed_origins,
            max_body_bytes,
            environment,
            jwt_secret,
            log_requests,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Split a comma separated origin list; `*` collapses to "any origin"
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}
