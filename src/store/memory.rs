use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    errors::{AppError, Result},
    models::{QueryOutput, Role, StatementKind, UsageLogEntry, User},
    store::{CredentialStore, QueryEngine},
};

/// Process-local store for development and tests. Every mutation happens
/// under the write lock, so increments are never lost.
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<Uuid, User>>,
    usage_log: RwLock<Vec<UsageLogEntry>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn usage_log(&self) -> Vec<UsageLogEntry> {
        self.usage_log.read().await.clone()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
        api_calls_limit: i32,
    ) -> Result<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(AppError::Validation("Email already exists".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.to_lowercase(),
            password_hash: password_hash.to_string(),
            role,
            api_calls_used: 0,
            api_calls_limit,
            created_at: Utc::now(),
            last_login_at: None,
            last_request_at: None,
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn increment_api_calls(&self, id: Uuid) -> Result<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.api_calls_used += 1;
                user.last_request_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_last_login(&self, id: Uuid) -> Result<()> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool> {
        let removed = self.users.write().await.remove(&id).is_some();
        if removed {
            self.usage_log.write().await.retain(|entry| entry.user_id != id);
        }
        Ok(removed)
    }

    async fn log_api_usage(&self, id: Uuid, endpoint: &str, method: &str) -> Result<()> {
        self.usage_log.write().await.push(UsageLogEntry {
            user_id: id,
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            requested_at: Utc::now(),
        });
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Stand-in engine for the memory backend, which has no SQL engine.
pub struct UnavailableQueryEngine;

#[async_trait]
impl QueryEngine for UnavailableQueryEngine {
    async fn run(&self, _sql: &str, _kind: StatementKind) -> Result<QueryOutput> {
        Err(AppError::QueryFailed(
            "no SQL engine is configured for the in-memory backend".to_string(),
        ))
    }
}
