use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::handlers::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::liveness,
        crate::handlers::health::readiness,
        crate::handlers::auth::signup,
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::auth::me,
        crate::handlers::sql::execute_post,
        crate::handlers::sql::execute_get,
        crate::handlers::ai::generate,
        crate::handlers::ai::synthesize,
        crate::handlers::admin::list_users,
        crate::handlers::admin::delete_user,
    ),
    components(
        schemas(
            crate::models::CredentialsRequest,
            crate::models::AuthResponse,
            crate::models::UserResponse,
            crate::models::Role,
            crate::models::SqlRequest,
            crate::models::GenerateRequest,
            crate::models::SpeechRequest,
            crate::models::QuotaStatus,
        )
    ),
    tags(
        (name = "auth", description = "Accounts and sessions"),
        (name = "sql", description = "Guarded SQL playground (metered)"),
        (name = "ai", description = "Text generation and speech synthesis (metered)"),
        (name = "admin", description = "Account administration"),
        (name = "health", description = "Health check endpoints")
    ),
    info(
        title = "Audiobook Gateway API",
        version = "1.0.0",
        description = "Authenticated gateway with a soft free-call quota in front of SQL, text and speech services"
    )
)]
pub struct ApiDoc;

pub fn create_docs_router() -> Router<AppState> {
    Router::new().route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
}
