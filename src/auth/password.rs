use bcrypt::{hash, verify, DEFAULT_COST};
use crate::errors::{AppError, Result};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Well-formed cost-12 hash that no account owns. Checking a password for an
/// unknown email against it costs the same as a real mismatch.
const UNOWNED_HASH: &str = "$2a$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";

pub struct PasswordService;

impl PasswordService {
    pub fn hash_password(password: &str) -> Result<String> {
        hash(password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))
    }

    /// A malformed stored hash counts as a mismatch rather than an error.
    pub fn verify_password(password: &str, hash: &str) -> bool {
        match verify(password, hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!("Stored password hash could not be checked: {}", e);
                false
            }
        }
    }

    /// Checks `password` against an account's stored hash, or against
    /// [`UNOWNED_HASH`] when no account matched, so both login failures do
    /// the same bcrypt work.
    pub fn verify_account(password: &str, stored_hash: Option<&str>) -> bool {
        match stored_hash {
            Some(hash) => Self::verify_password(password, hash),
            None => {
                let _ = verify(password, UNOWNED_HASH);
                false
            }
        }
    }

    pub fn validate_password_strength(password: &str) -> Result<()> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }

        if !password.chars().any(|c| c.is_alphabetic()) {
            return Err(AppError::Validation("Password must contain at least one letter".to_string()));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::Validation("Password must contain at least one digit".to_string()));
        }

        Ok(())
    }

    /// Trims and lower-cases an address, rejecting anything that is not
    /// `local@domain.tld`-shaped.
    pub fn normalize_email(email: &str) -> Result<String> {
        let email = email.trim().to_lowercase();

        if email.is_empty() {
            return Err(AppError::Validation("Email and password are required".to_string()));
        }

        let valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !email.chars().any(char::is_whitespace)
            }
            None => false,
        };

        if !valid {
            return Err(AppError::Validation("Invalid email format".to_string()));
        }

        Ok(email)
    }
}
