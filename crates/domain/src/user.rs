//! User-facing value types consumed by the password reset flow.

use serde::{Deserialize, Serialize};
use warden_core::{AppError, AppResult};

use crate::UserId;

/// Validated, lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs structural validation only: one `@`, non-empty local part and a
    /// domain containing at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let normalized = value.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        if normalized.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain an '@'".to_owned(),
            ));
        };

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.contains('@') || !domain.contains('.') || domain.ends_with('.') {
            return Err(AppError::Validation(
                "email domain must be a dotted host name".to_owned(),
            ));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// User account projection owned by the user service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// User identifier.
    pub id: UserId,
    /// Contact email used for notifications.
    pub email: EmailAddress,
    /// Preferred language as a BCP 47 tag, for example `en` or `pt-BR`.
    pub language_tag: String,
}

/// Minimum password length (NIST SP800-63B without a second factor).
pub const PASSWORD_MIN_LENGTH: usize = 10;

/// Maximum password length, bounding Argon2id hashing cost.
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Validates a new plaintext password.
pub fn validate_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        return Err(AppError::Validation(
            "this password is too common and has appeared in data breaches".to_owned(),
        ));
    }

    Ok(())
}

/// Breached passwords that satisfy the length rule.
static COMMON_PASSWORDS: &[&str] = &[
    "1234567890",
    "qwertyuiop",
    "password123",
    "password1234",
    "iloveyou123",
    "qwerty12345",
    "1q2w3e4r5t",
    "0987654321",
    "1111111111",
    "123456789a",
    "letmein123",
    "welcome123",
    "trustno1234",
    "sunshine123",
    "football123",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        let email = EmailAddress::new("  Email@Test.UT ");
        assert_eq!(
            email.ok().map(String::from),
            Some("email@test.ut".to_owned())
        );
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for value in ["", "noatsign", "@test.ut", "user@nodot", "a@b@c.ut", "user@host."] {
            assert!(EmailAddress::new(value).is_err(), "{value} should be rejected");
        }
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn adequate_password_is_accepted() {
        assert!(validate_password("a-reasonable-passphrase").is_ok());
    }

    #[test]
    fn common_password_is_rejected() {
        assert!(validate_password("Password123").is_err());
    }

    #[test]
    fn password_length_is_bounded() {
        assert!(validate_password(&"b".repeat(PASSWORD_MAX_LENGTH)).is_ok());
        assert!(validate_password(&"a".repeat(PASSWORD_MAX_LENGTH + 1)).is_err());
    }
}
