use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use axum_extra::extract::CookieJar;

use crate::{
    auth::TokenService,
    errors::{AppError, Result},
    handlers::AppState,
    models::User,
    store::CredentialStore,
};

pub const TOKEN_COOKIE: &str = "token";

/// Resolves request credentials to a stored user. Read-only.
pub struct Authenticator<'a> {
    tokens: &'a TokenService,
    store: &'a dyn CredentialStore,
}

impl<'a> Authenticator<'a> {
    pub fn new(tokens: &'a TokenService, store: &'a dyn CredentialStore) -> Self {
        Self { tokens, store }
    }

    /// A non-empty `token` cookie wins outright; the bearer header is only
    /// consulted when no such cookie was sent.
    pub fn extract_token(headers: &HeaderMap) -> Option<String> {
        let jar = CookieJar::from_headers(headers);
        if let Some(cookie) = jar.get(TOKEN_COOKIE) {
            if !cookie.value().is_empty() {
                return Some(cookie.value().to_string());
            }
        }

        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    }

    /// `Ok(None)` means the request is unauthenticated; `Err` is a store failure.
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<Option<User>> {
        let Some(token) = Self::extract_token(headers) else {
            return Ok(None);
        };

        let Some(identity) = self.tokens.verify(&token) else {
            return Ok(None);
        };

        let user = self.store.find_by_id(identity.user_id).await?;
        if user.is_none() {
            tracing::debug!("Token subject {} no longer exists", identity.user_id);
        }
        Ok(user)
    }
}

/// Authenticated caller; rejects with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let authenticator = Authenticator::new(&state.tokens, state.store.as_ref());

        match authenticator.resolve(&parts.headers).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                state.metrics.record_auth_failure();
                Err(AppError::unauthenticated())
            }
        }
    }
}

/// Authenticated caller with the admin role; 401 without credentials, 403
/// for other roles.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            tracing::warn!("User {} attempted an admin operation", user.id);
            return Err(AppError::Forbidden);
        }

        Ok(AdminUser(user))
    }
}
