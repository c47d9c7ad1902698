use axum::{
    http::{header, Method},
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod gateway;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;

use crate::{
    auth::PasswordService,
    errors::Result,
    handlers::AppState,
    models::Role,
};

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        // Public
        .route("/health", get(handlers::health::liveness))
        .route("/ready", get(handlers::health::readiness))
        .route("/metrics", get(handlers::metrics::metrics_handler))
        .merge(handlers::docs::create_docs_router())
        .merge(auth_routes())
        // Metered
        .route("/api/v1/sql", post(handlers::sql::execute_post))
        .route("/api/v1/sql/*query", get(handlers::sql::execute_get))
        .route("/api/ai/generate", post(handlers::ai::generate))
        .route("/api/tts/synthesize", post(handlers::ai::synthesize))
        // Admin
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route("/api/admin/users/:id", delete(handlers::admin::delete_user))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::metrics_middleware,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/register", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
}

/// Creates the configured admin account unless an account with that email
/// already exists.
pub async fn bootstrap_admin(state: &AppState) -> Result<()> {
    let (Some(email), Some(password)) = (&state.config.admin_email, &state.config.admin_password)
    else {
        return Ok(());
    };

    let email = PasswordService::normalize_email(email)?;
    if state.store.find_by_email(&email).await?.is_some() {
        tracing::debug!("Admin account {} already present", email);
        return Ok(());
    }

    let password_hash = PasswordService::hash_password(password)?;
    let admin = state
        .store
        .insert(&email, &password_hash, Role::Admin, state.config.default_api_calls_limit)
        .await?;

    tracing::info!("Bootstrapped admin account {}", admin.id);
    Ok(())
}
