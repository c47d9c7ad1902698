use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    Json,
};
use std::sync::Arc;

use crate::{
    auth::TokenService,
    config::Config,
    errors::{AppError, Result},
    services::{MetricsService, QuotaTracker, SpeechClient, TextGenerationClient},
    store::{Backend, CredentialStore, QueryEngine},
};

pub mod admin;
pub mod ai;
pub mod auth;
pub mod docs;
pub mod health;
pub mod metrics;
pub mod sql;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub engine: Arc<dyn QueryEngine>,
    pub quota: QuotaTracker,
    pub tokens: Arc<TokenService>,
    pub config: Arc<Config>,
    pub metrics: Arc<MetricsService>,
    pub speech: SpeechClient,
    pub textgen: TextGenerationClient,
}

impl AppState {
    pub fn new(config: Config, backend: Backend) -> Result<Self> {
        let metrics = MetricsService::new()
            .map_err(|e| AppError::Config(format!("failed to register metrics: {}", e)))?;
        let speech = SpeechClient::new(&config.tts_service_url, config.upstream_timeout_secs)?;
        let textgen = TextGenerationClient::new(
            &config.textgen_service_url,
            config.upstream_timeout_secs,
            config.textgen_max_new_tokens,
        )?;

        Ok(Self {
            quota: QuotaTracker::new(backend.credentials.clone()),
            store: backend.credentials,
            engine: backend.queries,
            tokens: Arc::new(TokenService::new(&config.jwt_secret)),
            config: Arc::new(config),
            metrics: Arc::new(metrics),
            speech,
            textgen,
        })
    }
}

/// Unwraps a JSON body, turning extractor rejections into the standard 400
/// envelope.
pub(crate) fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(AppError::Validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        ))),
    }
}

/// Unwraps a path segment the same way, so a malformed id or statement gets
/// the JSON envelope instead of axum's plain-text rejection.
pub(crate) fn path_param<T>(param: std::result::Result<Path<T>, PathRejection>) -> Result<T> {
    match param {
        Ok(Path(value)) => Ok(value),
        Err(rejection) => Err(AppError::Validation(format!(
            "Invalid path parameter: {}",
            rejection.body_text()
        ))),
    }
}
