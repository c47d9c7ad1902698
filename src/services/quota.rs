use std::sync::Arc;
use uuid::Uuid;

use crate::{
    errors::{AppError, Result},
    models::QuotaStatus,
    store::CredentialStore,
};

/// Soft free-tier quota. Exceeding the limit is reported, never enforced.
#[derive(Clone)]
pub struct QuotaTracker {
    store: Arc<dyn CredentialStore>,
}

impl QuotaTracker {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    pub async fn check_limit(&self, user_id: Uuid) -> Result<QuotaStatus> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or_else(AppError::unauthenticated)?;

        Ok(QuotaStatus::new(user.api_calls_used, user.api_calls_limit))
    }

    pub async fn increment(&self, user_id: Uuid) -> Result<()> {
        if !self.store.increment_api_calls(user_id).await? {
            return Err(AppError::unauthenticated());
        }
        Ok(())
    }
}
