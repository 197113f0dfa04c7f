//! Account session endpoints. None of these declare a role requirement; the
//! ones that need a caller resolve the bearer token themselves.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, header::AUTHORIZATION},
    routing::{get, post},
    Json, Router,
};

use storefront_auth::{extract_bearer, Registration, Role, UserSummary};

use crate::app::dto::{self, ApiResponse, AuthResponse};
use crate::app::errors::ApiError;
use crate::app::services::{self, AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/user", get(current_user))
        .route("/api/auth/ping", post(ping))
}

/// Bearer credential from the request, or a 401 envelope.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    extract_bearer(header).ok_or_else(|| ApiError::unauthorized("missing bearer token"))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let session = services::blocking(services, move |s| {
        s.sessions.register(
            s.users.as_ref(),
            s.passwords.as_ref(),
            Registration {
                email: body.email,
                password: body.password,
                role: Role::User,
            },
        )
    })
    .await?;

    Ok(Json(ApiResponse::success("registration successful", session.into())))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let session = services::blocking(services, move |s| {
        s.sessions
            .login(s.users.as_ref(), s.passwords.as_ref(), &body.email, &body.password)
    })
    .await?;

    Ok(Json(ApiResponse::success("login successful", session.into())))
}

/// Tokens are stateless; there is nothing to revoke.
pub async fn logout() -> Json<ApiResponse<()>> {
    Json(ApiResponse::success("logout successful", ()))
}

pub async fn current_user(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<UserSummary>>, ApiError> {
    let token = bearer_token(&headers)?;
    let record = services.sessions.current_user(services.users.as_ref(), token)?;
    Ok(Json(ApiResponse::success("ok", UserSummary::from(&record))))
}

/// Exchange a still-valid token for a fresh one.
pub async fn ping(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let token = bearer_token(&headers)?;
    let session = services.sessions.refresh(services.users.as_ref(), token)?;
    tracing::debug!(user_id = %session.user.id, "token refreshed");
    Ok(Json(ApiResponse::success("token refreshed", session.into())))
}
