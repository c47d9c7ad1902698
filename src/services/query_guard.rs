use serde_json::Value;

use crate::{
    errors::AppError,
    models::{QueryOutput, StatementKind},
    store::QueryEngine,
};

/// Keywords that reject a statement wherever they appear, including inside
/// literals and identifiers.
pub const BLOCKED_KEYWORDS: [&str; 8] = [
    "UPDATE", "DELETE", "DROP", "ALTER", "TRUNCATE", "CREATE", "GRANT", "REVOKE",
];

#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Blocked,
    Rows(Vec<Value>),
    Written { rows_affected: u64 },
    Failed(String),
}

pub struct QueryGuard;

impl QueryGuard {
    pub fn classify(text: &str) -> Option<StatementKind> {
        let upper = text.trim().to_uppercase();

        if BLOCKED_KEYWORDS.iter().any(|keyword| upper.contains(keyword)) {
            return None;
        }

        if upper.starts_with("SELECT") {
            Some(StatementKind::Select)
        } else if upper.starts_with("INSERT") {
            Some(StatementKind::Insert)
        } else {
            None
        }
    }

    pub fn is_safe(text: &str) -> bool {
        Self::classify(text).is_some()
    }

    pub async fn execute(engine: &dyn QueryEngine, text: &str) -> QueryOutcome {
        let Some(kind) = Self::classify(text) else {
            tracing::warn!("Rejected unsafe query");
            return QueryOutcome::Blocked;
        };

        match engine.run(text, kind).await {
            Ok(QueryOutput::Rows(rows)) => QueryOutcome::Rows(rows),
            Ok(QueryOutput::Written { rows_affected }) => QueryOutcome::Written { rows_affected },
            Err(AppError::QueryFailed(detail)) => QueryOutcome::Failed(detail),
            Err(e) => QueryOutcome::Failed(e.to_string()),
        }
    }
}
