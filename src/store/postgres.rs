use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    database::{
        queries::{PlaygroundQueries, UsageQueries, UserQueries},
        Database,
    },
    errors::{AppError, Result},
    models::{QueryOutput, Role, StatementKind, User},
    store::{CredentialStore, QueryEngine},
};

#[derive(Clone)]
pub struct PostgresCredentialStore {
    database: Database,
}

impl PostgresCredentialStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        UserQueries::find_by_email(self.database.pool(), email).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        UserQueries::find_by_id(self.database.pool(), id).await
    }

    async fn insert(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
        api_calls_limit: i32,
    ) -> Result<User> {
        UserQueries::create_user(
            self.database.pool(),
            email,
            password_hash,
            role.is_admin(),
            api_calls_limit,
        )
        .await
        .map_err(|e| match e {
            AppError::Database(sqlx::Error::Database(ref db)) if db.is_unique_violation() => {
                AppError::Validation("Email already exists".to_string())
            }
            other => other,
        })
    }

    async fn increment_api_calls(&self, id: Uuid) -> Result<bool> {
        UserQueries::increment_api_calls(self.database.pool(), id).await
    }

    async fn update_last_login(&self, id: Uuid) -> Result<()> {
        UserQueries::update_last_login(self.database.pool(), id).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        UserQueries::list_users(self.database.pool()).await
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool> {
        UserQueries::delete_user(self.database.pool(), id).await
    }

    async fn log_api_usage(&self, id: Uuid, endpoint: &str, method: &str) -> Result<()> {
        UsageQueries::log_api_usage(self.database.pool(), id, endpoint, method).await
    }

    async fn ping(&self) -> Result<()> {
        PlaygroundQueries::ping(self.database.pool()).await
    }
}

#[async_trait]
impl QueryEngine for PostgresCredentialStore {
    async fn run(&self, sql: &str, kind: StatementKind) -> Result<QueryOutput> {
        match kind {
            StatementKind::Select => {
                let rows = PlaygroundQueries::select_as_json(self.database.pool(), sql).await?;
                Ok(QueryOutput::Rows(rows))
            }
            StatementKind::Insert => {
                let rows_affected = PlaygroundQueries::execute_insert(self.database.pool(), sql).await?;
                Ok(QueryOutput::Written { rows_affected })
            }
        }
    }
}
