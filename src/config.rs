use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{env, str::FromStr};

/// Signing key used when running in development without `JWT_SECRET`.
pub const DEV_JWT_SECRET: &str = "insecure-development-secret-do-not-use-in-production";

pub const DEFAULT_API_CALLS_LIMIT: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => bail!("unknown APP_ENV '{}'", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("unknown STORE_BACKEND '{}'", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout_secs: u64,
    pub jwt_secret: String,
    pub default_api_calls_limit: i32,
    pub tts_service_url: String,
    pub textgen_service_url: String,
    pub textgen_max_new_tokens: u32,
    pub upstream_timeout_secs: u64,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Production
    /// refuses to start without an explicit signing secret.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let environment: Environment = var("APP_ENV", "development").parse()?;

        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None if environment == Environment::Production => {
                bail!("JWT_SECRET must be set when APP_ENV=production")
            }
            None => DEV_JWT_SECRET.to_string(),
        };

        if environment == Environment::Production && jwt_secret == DEV_JWT_SECRET {
            bail!("the development JWT secret cannot be used in production");
        }

        Ok(Config {
            environment,
            host: var("HOST", "0.0.0.0"),
            port: var("PORT", "3000").parse().context("invalid PORT")?,
            store_backend: var("STORE_BACKEND", "postgres").parse()?,
            database_url: var("DATABASE_URL", "postgresql://localhost/audiobook"),
            database_max_connections: var("DATABASE_MAX_CONNECTIONS", "20")
                .parse()
                .context("invalid DATABASE_MAX_CONNECTIONS")?,
            database_acquire_timeout_secs: var("DATABASE_ACQUIRE_TIMEOUT_SECS", "5")
                .parse()
                .context("invalid DATABASE_ACQUIRE_TIMEOUT_SECS")?,
            jwt_secret,
            default_api_calls_limit: var("DEFAULT_API_CALLS_LIMIT", "20")
                .parse()
                .context("invalid DEFAULT_API_CALLS_LIMIT")?,
            tts_service_url: var("TTS_SERVICE_URL", "http://localhost:8081"),
            textgen_service_url: var("TEXTGEN_SERVICE_URL", "http://localhost:8082"),
            textgen_max_new_tokens: var("TEXTGEN_MAX_NEW_TOKENS", "256")
                .parse()
                .context("invalid TEXTGEN_MAX_NEW_TOKENS")?,
            upstream_timeout_secs: var("UPSTREAM_TIMEOUT_SECS", "30")
                .parse()
                .context("invalid UPSTREAM_TIMEOUT_SECS")?,
            admin_email: lookup("ADMIN_EMAIL").filter(|s| !s.trim().is_empty()),
            admin_password: lookup("ADMIN_PASSWORD").filter(|s| !s.is_empty()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    /// Configuration for tests and local runs: in-memory store, dev secret.
    pub fn for_development() -> Self {
        Config {
            environment: Environment::Development,
            host: "127.0.0.1".to_string(),
            port: 0,
            store_backend: StoreBackend::Memory,
            database_url: String::new(),
            database_max_connections: 1,
            database_acquire_timeout_secs: 5,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            default_api_calls_limit: DEFAULT_API_CALLS_LIMIT,
            tts_service_url: "http://localhost:8081".to_string(),
            textgen_service_url: "http://localhost:8082".to_string(),
            textgen_max_new_tokens: 256,
            upstream_timeout_secs: 30,
            admin_email: None,
            admin_password: None,
        }
    }
}
