use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

// =============================================================================
// Password Hashing
// =============================================================================

/// Hash a plaintext password with Argon2id and a fresh random salt
///
/// Returns a PHC-format string (`$argon2id$v=19$...`) which carries the salt
/// and parameters, so verification needs nothing else.
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| format!("Failed to hash password: {}", e))
}

/// Check a plaintext password against a stored PHC hash
///
/// `Ok(false)` means the password does not match; `Err` means the stored
/// hash itself could not be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    let parsed = PasswordHash::new(hash).map_err(|e| format!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

// =============================================================================
// HMAC
// =============================================================================

/// Compute an HMAC-SHA256 tag over `data`
pub fn sign_hmac(data: &[u8], secret: &str) -> Result<Vec<u8>, String> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .map_err(|e| format!("Failed to create HMAC instance: {}", e))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Verify an HMAC-SHA256 tag in constant time
pub fn verify_hmac(data: &[u8], signature: &[u8], secret: &str) -> bool {
    let mut mac = match <HmacSha256 as Mac>::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            tracing::error!("Failed to create HMAC instance");
            return false;
        }
    };

    mac.update(data);
    mac.verify_slice(signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_is_salted() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();

        assert!(first.starts_with("$argon2id$"));
        // Same password, different salt
        assert_ne!(first, second);
        assert!(!first.contains("hunter2"));
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("correct horse").unwrap();

        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_malformed_hash() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_verify_hmac_valid() {
        let signature = sign_hmac(b"test data", "test-secret-key").unwrap();
        assert!(verify_hmac(b"test data", &signature, "test-secret-key"));
    }

    #[test]
    fn test_verify_hmac_wrong_secret() {
        let signature = sign_hmac(b"test data", "test-secret-key").unwrap();
        assert!(!verify_hmac(b"test data", &signature, "wrong-secret"));
    }

    #[test]
    fn test_verify_hmac_tampered_data() {
        let signature = sign_hmac(b"test data", "test-secret-key").unwrap();
        assert!(!verify_hmac(b"test datA", &signature, "test-secret-key"));
        assert!(!verify_hmac(b"test data", &[0u8; 32], "test-secret-key"));
    }
}
