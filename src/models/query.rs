use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SqlRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    Select,
    Insert,
}

/// What the engine produced for a guarded statement.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    Rows(Vec<serde_json::Value>),
    Written { rows_affected: u64 },
}
