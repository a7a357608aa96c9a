/// Lifetime of a login token (1 day)
pub const USER_TOKEN_TTL_SECS: i64 = 86_400;

/// Lifetime of an anonymous guest token (7 days)
pub const GUEST_TOKEN_TTL_SECS: i64 = 7 * 86_400;

/// Default request body limit (25MB)
/// Setcards carry their photos inline as Base64, so the framework's 2MB
/// default is far too small for a handful of images.
pub const DEFAULT_MAX_BODY_BYTES: usize = 26_214_400;

/// Maximum number of photos accepted on a single setcard
pub const MAX_PHOTOS_PER_SETCARD: usize = 50;

/// Fallback signing secret used when JWT_SECRET is not configured
pub const INSECURE_DEFAULT_SECRET: &str = "insecure-development-secret";

/// Fixed response of the liveness probe at /api/test
pub const TEST_ROUTE_MESSAGE: &str = "API is working";

// =============================================================================
// Error Messages
// =============================================================================

pub const ERR_NO_TOKEN: &str = "Access denied, no token provided";

pub const ERR_INVALID_TOKEN: &str = "Invalid token";

pub const ERR_INVALID_OR_EXPIRED_TOKEN: &str = "Invalid or expired token";

pub const ERR_TOKEN_REQUIRED: &str = "Token is required";

pub const ERR_USERNAME_TAKEN: &str = "Username already exists";

pub const ERR_USER_NOT_FOUND: &str = "User not found";

pub const ERR_INVALID_CREDENTIALS: &str = "Invalid credentials";
