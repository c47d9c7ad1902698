use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    config::{Config, StoreBackend},
    database::Database,
    errors::Result,
    models::{QueryOutput, Role, StatementKind, User},
};

pub mod memory;
pub mod postgres;

pub use memory::{MemoryCredentialStore, UnavailableQueryEngine};
pub use postgres::PostgresCredentialStore;

/// Persistence contract for user records, quota counters and the usage log.
///
/// Emails passed in are expected to be normalized already; implementations
/// still compare them case-insensitively.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn insert(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
        api_calls_limit: i32,
    ) -> Result<User>;

    /// Atomically adds one to `api_calls_used` and stamps `last_request_at`.
    /// Returns `false` when the user does not exist.
    async fn increment_api_calls(&self, id: Uuid) -> Result<bool>;

    async fn update_last_login(&self, id: Uuid) -> Result<()>;

    async fn list_users(&self) -> Result<Vec<User>>;

    async fn delete_user(&self, id: Uuid) -> Result<bool>;

    async fn log_api_usage(&self, id: Uuid, endpoint: &str, method: &str) -> Result<()>;

    async fn ping(&self) -> Result<()>;
}

/// Executes statements that already passed the query guard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn run(&self, sql: &str, kind: StatementKind) -> Result<QueryOutput>;
}

#[derive(Clone)]
pub struct Backend {
    pub credentials: Arc<dyn CredentialStore>,
    pub queries: Arc<dyn QueryEngine>,
}

pub async fn create_backend(config: &Config) -> Result<Backend> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let database = Database::new(
                &config.database_url,
                config.database_max_connections,
                config.database_acquire_timeout_secs,
            )
            .await?;
            database.migrate().await?;

            let store = Arc::new(PostgresCredentialStore::new(database));
            Ok(Backend {
                credentials: store.clone(),
                queries: store,
            })
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory credential store; data is lost on restart");
            Ok(Backend {
                credentials: Arc::new(MemoryCredentialStore::new()),
                queries: Arc::new(UnavailableQueryEngine),
            })
        }
    }
}
