//! Metered dispatch.
//!
//! A request moves through `Unauthenticated -> Authenticated -> Authorized ->
//! Executed -> Responded`. The first three stages are the `CurrentUser` and
//! `AdminUser` extractors; a failure there short-circuits straight to the
//! response. [`metered`] covers the last two for endpoints that consume the
//! free-call quota.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use std::future::Future;

use crate::{
    errors::{AppError, Result},
    handlers::AppState,
    models::User,
};

/// Runs `operation` for `user`, then counts the call exactly once whatever
/// the operation returned, appends the usage log and annotates the body with
/// the post-increment quota state. The quota is soft: an exhausted user still
/// gets the operation's result.
///
/// The work runs on its own task, so a caller that disconnects mid-flight
/// is still counted for an operation that already started.
pub async fn metered<F>(
    state: AppState,
    user: User,
    endpoint: &'static str,
    method: &'static str,
    operation: F,
) -> Result<Response>
where
    F: Future<Output = Result<Map<String, Value>>> + Send + 'static,
{
    let task = tokio::spawn(async move { settle(&state, &user, endpoint, method, operation).await });

    let (status, body) = task
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("metered task failed: {}", e)))??;

    Ok((status, Json(Value::Object(body))).into_response())
}

async fn settle<F>(
    state: &AppState,
    user: &User,
    endpoint: &str,
    method: &str,
    operation: F,
) -> Result<(StatusCode, Map<String, Value>)>
where
    F: Future<Output = Result<Map<String, Value>>>,
{
    let outcome = operation.await;

    state.quota.increment(user.id).await?;

    if let Err(e) = state.store.log_api_usage(user.id, endpoint, method).await {
        tracing::warn!("Failed to append usage log for user {}: {}", user.id, e);
    }

    let quota = state.quota.check_limit(user.id).await?;
    state.metrics.record_metered_call(endpoint, quota.exceeded);
    if quota.exceeded {
        tracing::warn!(
            "User {} is over the free quota ({}/{}) on {}",
            user.id,
            quota.used,
            quota.limit,
            endpoint
        );
    }

    let (status, mut body) = match outcome {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (e.status(), e.body()),
    };

    body.insert("apiLimitExceeded".to_string(), Value::Bool(quota.exceeded));
    body.insert(
        "usage".to_string(),
        json!({
            "used": quota.used,
            "limit": quota.limit,
            "remaining": quota.remaining,
        }),
    );

    Ok((status, body))
}

/// Starts a successful response body.
pub fn success(message: &str) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("success".to_string(), Value::Bool(true));
    body.insert("message".to_string(), Value::String(message.to_string()));
    body
}
