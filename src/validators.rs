/// Input validators
///
/// Request-level checks applied before anything reaches the store:
/// 1. Email format and length limits
/// 2. Password policy (layered on top of the hasher)
/// 3. Chirp body length

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MIN_EMAIL_LENGTH: usize = 5;
const MAX_EMAIL_LOCAL_PART: usize = 64;

const MIN_PASSWORD_LENGTH: usize = 8;
// bcrypt only looks at the first 72 bytes
const MAX_PASSWORD_LENGTH: usize = 72;

pub const MAX_CHIRP_LENGTH: usize = 140;

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();
}

/// Validates an email address and returns it trimmed
pub fn is_valid_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("email".to_string()));
    }

    if trimmed.len() < MIN_EMAIL_LENGTH {
        return Err(ValidationError::TooShort("email".to_string(), MIN_EMAIL_LENGTH));
    }

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("email".to_string()));
    }

    if has_suspicious_email_patterns(trimmed) {
        return Err(ValidationError::SuspiciousContent("email".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Password policy for new credentials
///
/// Requirements:
/// - 8 to 72 bytes
/// - At least one digit
/// - At least one lowercase letter
/// - At least one uppercase letter
pub fn is_valid_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort(
            "password".to_string(),
            MIN_PASSWORD_LENGTH,
        ));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_LENGTH,
        ));
    }

    let has_digit = password.chars().any(|c| c.is_numeric());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_uppercase());

    if !has_digit || !has_lowercase || !has_uppercase {
        return Err(ValidationError::InvalidFormat(
            "password must contain at least one digit, one lowercase letter, and one uppercase letter"
                .to_string(),
        ));
    }

    Ok(())
}

/// Validates a chirp body: non-blank, at most 140 characters
pub fn is_valid_chirp_body(body: &str) -> Result<String, ValidationError> {
    if body.trim().is_empty() {
        return Err(ValidationError::EmptyField("body".to_string()));
    }

    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ValidationError::TooLong("body".to_string(), MAX_CHIRP_LENGTH));
    }

    Ok(body.to_string())
}

fn has_suspicious_email_patterns(email: &str) -> bool {
    if let Some(at_pos) = email.find('@') {
        if email[..at_pos].len() > MAX_EMAIL_LOCAL_PART {
            return true;
        }
    }

    email.matches('@').count() != 1 || email.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("user@example.com").is_ok());
        assert!(is_valid_email("test.email@domain.co.uk").is_ok());
        assert!(is_valid_email("user+tag@example.com").is_ok());
        assert!(is_valid_email("broadcast@example.com").is_ok());
    }

    #[test]
    fn test_email_is_trimmed() {
        assert_eq!(is_valid_email("  user@example.com ").unwrap(), "user@example.com");
    }

    #[test]
    fn test_invalid_email_format() {
        assert!(is_valid_email("invalid").is_err());
        assert!(is_valid_email("user@").is_err());
        assert!(is_valid_email("@example.com").is_err());
        assert!(is_valid_email("user@@example.com").is_err());
    }

    #[test]
    fn test_email_length_limits() {
        let too_long = format!("{}@example.com", "a".repeat(250));
        assert!(is_valid_email(&too_long).is_err());

        assert!(is_valid_email("a@a").is_err());
    }

    #[test]
    fn test_long_local_part_is_suspicious() {
        let email = format!("{}@example.com", "a".repeat(65));
        assert!(matches!(
            is_valid_email(&email),
            Err(ValidationError::SuspiciousContent(_))
        ));
    }

    #[test]
    fn test_valid_password() {
        assert!(is_valid_password("ValidPassword123").is_ok());
    }

    #[test]
    fn test_too_short_password() {
        assert!(is_valid_password("Short1").is_err());
    }

    #[test]
    fn test_too_long_password() {
        let long_password = "a".repeat(MAX_PASSWORD_LENGTH) + "A1";
        assert!(is_valid_password(&long_password).is_err());
    }

    #[test]
    fn test_password_character_classes() {
        assert!(is_valid_password("NoDigitsPassword").is_err());
        assert!(is_valid_password("NOLOWERCASE1").is_err());
        assert!(is_valid_password("nouppercase1").is_err());
    }

    #[test]
    fn test_chirp_body_limits() {
        assert!(is_valid_chirp_body("I had something interesting for breakfast").is_ok());
        assert!(is_valid_chirp_body(&"a".repeat(MAX_CHIRP_LENGTH)).is_ok());
        assert!(is_valid_chirp_body(&"a".repeat(MAX_CHIRP_LENGTH + 1)).is_err());
        assert!(is_valid_chirp_body("   ").is_err());
    }

    #[test]
    fn test_chirp_length_counts_characters() {
        let body = "é".repeat(MAX_CHIRP_LENGTH);
        assert!(is_valid_chirp_body(&body).is_ok());
    }
}
