use sqlx::PgPool;
use uuid::Uuid;
use crate::models::*;
use crate::errors::Result;

const USER_COLUMNS: &str = "id, email, password_hash, is_admin, api_calls_used, api_calls_limit, \
                            created_at, last_login_at, last_request_at";

pub struct UserQueries;

impl UserQueries {
    pub async fn create_user(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
        is_admin: bool,
        api_calls_limit: i32,
    ) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (email, password_hash, is_admin, api_calls_limit)
            VALUES (LOWER($1), $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(password_hash)
        .bind(is_admin)
        .bind(api_calls_limit)
        .fetch_one(pool)
        .await?;

        Ok(row.into())
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(User::from))
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(User::from))
    }

    pub async fn list_users(pool: &PgPool) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Single-statement increment so concurrent requests never lose updates.
    pub async fn increment_api_calls(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET api_calls_used = api_calls_used + 1, last_request_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn delete_user(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub struct UsageQueries;

impl UsageQueries {
    pub async fn log_api_usage(pool: &PgPool, user_id: Uuid, endpoint: &str, method: &str) -> Result<()> {
        sqlx::query("INSERT INTO api_usage_log (user_id, endpoint, method) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(endpoint)
            .bind(method)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn usage_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<UsageLogEntry>> {
        let entries = sqlx::query_as::<_, UsageLogEntry>(
            r#"
            SELECT user_id, endpoint, method, requested_at
            FROM api_usage_log
            WHERE user_id = $1
            ORDER BY requested_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(entries)
    }
}

pub struct PlaygroundQueries;

impl PlaygroundQueries {
    /// Runs a guarded SELECT and folds the result set into a JSON array.
    pub async fn select_as_json(pool: &PgPool, sql: &str) -> Result<Vec<serde_json::Value>> {
        let wrapped = wrap_select(sql);

        let rows: serde_json::Value = sqlx::query_scalar(&wrapped).fetch_one(pool).await?;

        Ok(match rows {
            serde_json::Value::Array(rows) => rows,
            other => vec![other],
        })
    }

    pub async fn execute_insert(pool: &PgPool, sql: &str) -> Result<u64> {
        let result = sqlx::query(strip_terminator(sql)).execute(pool).await?;
        Ok(result.rows_affected())
    }

    pub async fn ping(pool: &PgPool) -> Result<()> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}

/// The subquery closes on its own line so a trailing `--` comment in the
/// caller's statement cannot swallow the wrapper.
fn wrap_select(sql: &str) -> String {
    format!(
        "SELECT COALESCE(json_agg(row_to_json(q)), '[]'::json) FROM ({}\n) AS q",
        strip_terminator(sql)
    )
}

fn strip_terminator(sql: &str) -> &str {
    sql.trim().trim_end_matches(';').trim_end()
}
