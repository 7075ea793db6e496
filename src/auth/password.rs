/// Password Hashing and Verification
///
/// Salted bcrypt digests. Password policy is enforced by callers
/// (see `validators::is_valid_password`), not here.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AuthError;

/// Hash a password using bcrypt
///
/// # Errors
/// Returns `AuthError::Hashing` if bcrypt rejects the input
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    hash(password, DEFAULT_COST).map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Verify a password against its hash
///
/// `Ok(false)` means a well-formed digest that does not match.
///
/// # Errors
/// Returns `AuthError::Hashing` if the stored digest is not a bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    verify(password, hash).map_err(|e| AuthError::Hashing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = "ValidPassword123";
        let hash = hash_password(password).expect("Failed to hash password");

        assert_ne!(password, hash);
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn test_verify_password() {
        let password = "ValidPassword123";
        let hash = hash_password(password).expect("Failed to hash password");

        let is_valid = verify_password(password, &hash).expect("Failed to verify password");
        assert!(is_valid);
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = hash_password("ValidPassword123").expect("Failed to hash password");

        let is_valid =
            verify_password("WrongPassword123", &hash).expect("Failed to verify password");
        assert!(!is_valid);
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let first = hash_password("ValidPassword123").unwrap();
        let second = hash_password("ValidPassword123").unwrap();

        // Salted: digests differ, yet both verify
        assert_ne!(first, second);
        assert!(verify_password("ValidPassword123", &first).unwrap());
        assert!(verify_password("ValidPassword123", &second).unwrap());
    }

    #[test]
    fn test_malformed_digest_is_an_error() {
        let result = verify_password("ValidPassword123", "not-a-bcrypt-hash");
        assert!(matches!(result, Err(AuthError::Hashing(_))));
    }
}
