use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    auth::PasswordService,
    config::Config,
    errors::{AppError, Result},
    handlers::{json_body, AppState},
    middleware::{CurrentUser, TOKEN_COOKIE},
    models::{AuthResponse, CredentialsRequest, Role, User, UserResponse},
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

fn token_cookie(config: &Config, value: String, max_age: time::Duration) -> Cookie<'static> {
    let builder = Cookie::build((TOKEN_COOKIE, value))
        .path("/")
        .http_only(true)
        .max_age(max_age);

    let builder = if config.is_production() {
        builder.secure(true).same_site(SameSite::None)
    } else {
        builder.same_site(SameSite::Lax)
    };

    builder.build()
}

fn session_response(
    state: &AppState,
    jar: CookieJar,
    user: &User,
    message: &str,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let token = state.tokens.issue(user.id, user.role)?;
    let max_age = time::Duration::seconds(state.tokens.token_duration().num_seconds());
    let jar = jar.add(token_cookie(&state.config, token.clone(), max_age));

    Ok((
        jar,
        Json(AuthResponse {
            success: true,
            message: message.to_string(),
            token,
            user: UserResponse::from(user),
        }),
    ))
}

fn require_credentials(request: &CredentialsRequest) -> Result<()> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::Validation("Email and password are required".to_string()));
    }
    Ok(())
}

/// Create an account and start a session.
///
/// Answers 201 Created rather than 200 because a new account resource now
/// exists. Clients that only check for a 2xx status are unaffected.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created (201 Created, not 200); session cookie set", body = AuthResponse),
        (status = 400, description = "Missing fields, invalid email, weak password or duplicate email")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    let request = json_body(payload)?;
    require_credentials(&request)?;

    let email = PasswordService::normalize_email(&request.email)?;
    PasswordService::validate_password_strength(&request.password)?;

    if state.store.find_by_email(&email).await?.is_some() {
        return Err(AppError::Validation("Email already exists".to_string()));
    }

    let password_hash = PasswordService::hash_password(&request.password)?;
    let user = state
        .store
        .insert(&email, &password_hash, Role::Standard, state.config.default_api_calls_limit)
        .await?;

    tracing::info!("New account registered: {}", user.id);

    let (jar, body) = session_response(&state, jar, &user, "User registered successfully")?;
    Ok((StatusCode::CREATED, jar, body))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = AuthResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let request = json_body(payload)?;
    require_credentials(&request)?;

    let email = request.email.trim().to_lowercase();
    let found = state.store.find_by_email(&email).await?;
    let verified = PasswordService::verify_account(
        &request.password,
        found.as_ref().map(|user| user.password_hash.as_str()),
    );
    let user = match found {
        Some(user) if verified => user,
        _ => {
            state.metrics.record_auth_failure();
            tracing::warn!("Failed login attempt");
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        }
    };

    state.store.update_last_login(user.id).await?;
    let user = User {
        last_login_at: Some(Utc::now()),
        ..user
    };

    tracing::info!("User {} logged in", user.id);

    session_response(&state, jar, &user, "Login successful")
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses((status = 200, description = "Session cookie cleared"))
)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    let jar = jar.add(token_cookie(&state.config, String::new(), time::Duration::ZERO));

    (
        jar,
        Json(json!({
            "success": true,
            "message": "Logged out successfully"
        })),
    )
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "The authenticated user", body = UserResponse),
        (status = 401, description = "Authentication failed")
    )
)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<Value> {
    Json(json!({
        "success": true,
        "user": UserResponse::from(&user)
    }))
}
