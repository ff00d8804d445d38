//! Argon2id password hasher used when a reset completes.
//!
//! Parameters follow the OWASP baseline: m=19456 (19 MiB), t=2, p=1.

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHasher};
use warden_application::PasswordHasher as PasswordHasherPort;
use warden_core::{AppError, AppResult};

/// Argon2id implementation of the password hasher port.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Creates a hasher with the baseline parameters.
    #[must_use]
    pub fn new() -> Self {
        let params = Params::new(19456, 2, 1, None).unwrap_or_else(|_| Params::default());

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, argon2::Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherPort for Argon2PasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|error| AppError::Internal(format!("failed to hash password: {error}")))
    }
}

#[cfg(test)]
mod tests {
    use argon2::{PasswordHash, PasswordVerifier};
    use warden_application::PasswordHasher as PasswordHasherPort;
    use warden_core::{AppError, AppResult};

    use super::Argon2PasswordHasher;

    #[test]
    fn hash_is_argon2id_and_verifies() -> AppResult<()> {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash_password("a much better passphrase")?;
        let parsed = PasswordHash::new(&hash)
            .map_err(|error| AppError::Internal(format!("unparseable hash: {error}")))?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(
            hasher
                .argon2
                .verify_password(b"a much better passphrase", &parsed)
                .is_ok()
        );
        assert!(
            hasher
                .argon2
                .verify_password(b"a wrong passphrase", &parsed)
                .is_err()
        );
        Ok(())
    }

    #[test]
    fn same_password_gets_distinct_salts() -> AppResult<()> {
        let hasher = Argon2PasswordHasher::new();

        assert_ne!(
            hasher.hash_password("repeatable input")?,
            hasher.hash_password("repeatable input")?
        );
        Ok(())
    }
}
