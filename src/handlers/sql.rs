use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::{Json, Response},
};
use serde_json::{json, Map, Value};

use crate::{
    errors::{AppError, Result},
    gateway::{metered, success},
    handlers::{json_body, path_param, AppState},
    middleware::CurrentUser,
    models::SqlRequest,
    services::{QueryGuard, QueryOutcome},
};

pub const SQL_ENDPOINT: &str = "/api/v1/sql";

async fn run_guarded(state: AppState, query: String) -> Result<Map<String, Value>> {
    match QueryGuard::execute(state.engine.as_ref(), &query).await {
        QueryOutcome::Blocked => {
            state.metrics.record_query_rejected();
            Err(AppError::QueryRejected)
        }
        QueryOutcome::Rows(rows) => {
            let mut body = success("Query executed successfully");
            body.insert("count".to_string(), json!(rows.len()));
            body.insert("data".to_string(), Value::Array(rows));
            Ok(body)
        }
        QueryOutcome::Written { rows_affected } => {
            let mut body = success("Query executed successfully");
            body.insert("rowsAffected".to_string(), json!(rows_affected));
            Ok(body)
        }
        QueryOutcome::Failed(detail) => Err(AppError::QueryFailed(detail)),
    }
}

fn require_query(query: &str) -> Result<&str> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("Query is required".to_string()));
    }
    Ok(query)
}

#[utoipa::path(
    post,
    path = "/api/v1/sql",
    tag = "sql",
    request_body = SqlRequest,
    responses(
        (status = 200, description = "Rows or rows affected, plus quota annotations"),
        (status = 400, description = "Missing query, blocked statement or engine error"),
        (status = 401, description = "Authentication failed")
    )
)]
pub async fn execute_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: std::result::Result<Json<SqlRequest>, JsonRejection>,
) -> Result<Response> {
    let request = json_body(payload)?;
    let query = require_query(&request.query)?.to_string();

    let operation = run_guarded(state.clone(), query);
    metered(state, user, SQL_ENDPOINT, "POST", operation).await
}

#[utoipa::path(
    get,
    path = "/api/v1/sql/{query}",
    tag = "sql",
    params(("query" = String, Path, description = "URL-encoded SELECT or INSERT statement")),
    responses(
        (status = 200, description = "Rows or rows affected, plus quota annotations"),
        (status = 400, description = "Blocked statement or engine error"),
        (status = 401, description = "Authentication failed")
    )
)]
pub async fn execute_get(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    query: std::result::Result<Path<String>, PathRejection>,
) -> Result<Response> {
    let query = path_param(query)?;
    let query = require_query(&query)?.to_string();

    let operation = run_guarded(state.clone(), query);
    metered(state, user, SQL_ENDPOINT, "GET", operation).await
}
