use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Standard,
    Admin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn from_is_admin(is_admin: bool) -> Self {
        if is_admin {
            Role::Admin
        } else {
            Role::Standard
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub api_calls_used: i32,
    pub api_calls_limit: i32,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub last_request_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn free_calls_remaining(&self) -> i32 {
        (self.api_calls_limit - self.api_calls_used).max(0)
    }

    pub fn api_limit_exceeded(&self) -> bool {
        self.api_calls_used >= self.api_calls_limit
    }
}

/// Row shape of the `users` table; the role is persisted as `is_admin`.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub api_calls_used: i32,
    pub api_calls_limit: i32,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub last_request_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role: Role::from_is_admin(row.is_admin),
            api_calls_used: row.api_calls_used,
            api_calls_limit: row.api_calls_limit,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
            last_request_at: row.last_request_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub api_calls_used: i32,
    pub api_calls_limit: i32,
    pub free_calls_remaining: i32,
    pub api_limit_exceeded: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub last_request_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            api_calls_used: user.api_calls_used,
            api_calls_limit: user.api_calls_limit,
            free_calls_remaining: user.free_calls_remaining(),
            api_limit_exceeded: user.api_limit_exceeded(),
            created_at: user.created_at,
            last_login_at: user.last_login_at,
            last_request_at: user.last_request_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}
