use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UsageLogEntry {
    pub user_id: Uuid,
    pub endpoint: String,
    pub method: String,
    pub requested_at: DateTime<Utc>,
}

/// Snapshot of a user's free-tier usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct QuotaStatus {
    pub used: i32,
    pub limit: i32,
    pub remaining: i32,
    pub exceeded: bool,
}

impl QuotaStatus {
    pub fn new(used: i32, limit: i32) -> Self {
        Self {
            used,
            limit,
            remaining: (limit - used).max(0),
            exceeded: used >= limit,
        }
    }
}
