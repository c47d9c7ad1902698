use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    errors::{AppError, Result},
    handlers::{path_param, AppState},
    middleware::AdminUser,
    models::UserResponse,
};

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "admin",
    responses(
        (status = 200, description = "All accounts with their usage", body = [UserResponse]),
        (status = 401, description = "Authentication failed"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Value>> {
    let users: Vec<UserResponse> = state
        .store
        .list_users()
        .await?
        .iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(json!({
        "success": true,
        "count": users.len(),
        "users": users
    })))
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 400, description = "Malformed id or self-deletion"),
        (status = 401, description = "Authentication failed"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "No such account")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    user_id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>> {
    let user_id = path_param(user_id)?;
    if user_id == admin.id {
        return Err(AppError::Validation("Admins cannot delete their own account".to_string()));
    }

    if !state.store.delete_user(user_id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!("Admin {} deleted user {}", admin.id, user_id);

    Ok(Json(json!({
        "success": true,
        "message": "User deleted successfully"
    })))
}
