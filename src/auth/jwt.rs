use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::Role;

pub const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Identity carried by a token that passed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenIdentity {
    pub user_id: Uuid,
    pub role: Role,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_duration: Duration,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            validation,
            token_duration: Duration::days(TOKEN_TTL_DAYS),
        }
    }

    pub fn token_duration(&self) -> Duration {
        self.token_duration
    }

    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<String> {
        self.issue_at(user_id, role, Utc::now())
    }

    fn issue_at(&self, user_id: Uuid, role: Role, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.token_duration).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign token: {}", e)))
    }

    /// Returns `None` for malformed, tampered, expired or foreign tokens.
    pub fn verify(&self, token: &str) -> Option<TokenIdentity> {
        let token_data = match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!("Token rejected: {}", e);
                return None;
            }
        };

        let user_id = Uuid::parse_str(&token_data.claims.sub).ok()?;

        Some(TokenIdentity {
            user_id,
            role: token_data.claims.role,
        })
    }
}
