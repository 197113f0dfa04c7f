//! Account administration. Every route here is admin-only (see `authz`).

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use storefront_auth::{session::validate_password, NewUser, UserChanges, UserSummary};
use storefront_core::{Email, UserId};

use crate::app::dto::{self, ApiResponse};
use crate::app::errors::ApiError;
use crate::app::services::{self, AppServices};
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/:id", get(get_user).put(update_user).delete(delete_user))
}

fn parse_id(raw: &str) -> Result<UserId, ApiError> {
    raw.parse().map_err(|e: storefront_core::DomainError| ApiError::bad_request(e.to_string()))
}

fn parse_email(raw: &str) -> Result<Email, ApiError> {
    Email::parse(raw).map_err(|e| ApiError::bad_request(e.to_string()))
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<ApiResponse<Vec<UserSummary>>>, ApiError> {
    let users = services.users.list()?;
    let items: Vec<UserSummary> = users.iter().map(UserSummary::from).collect();
    Ok(Json(ApiResponse::success("ok", items)))
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserSummary>>, ApiError> {
    let id = parse_id(&id)?;
    let record = services
        .users
        .find_by_id(id)?
        .ok_or_else(|| ApiError::not_found("user not found"))?;
    Ok(Json(ApiResponse::success("ok", UserSummary::from(&record))))
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentUser(admin): CurrentUser,
    Json(body): Json<dto::CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserSummary>>), ApiError> {
    let email = parse_email(&body.email)?;
    validate_password(&body.password)?;
    let role = body.role;

    let record = services::blocking(services, move |s| -> Result<_, ApiError> {
        let password_hash = s.passwords.hash(&body.password)?;
        Ok(s.users.insert(NewUser { email, password_hash, role })?)
    })
    .await?;

    tracing::info!(admin_id = %admin.user_id, user_id = %record.id, role = %record.role, "user created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("user created", UserSummary::from(&record))),
    ))
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentUser(admin): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserSummary>>, ApiError> {
    let id = parse_id(&id)?;
    let email = body.email.as_deref().map(parse_email).transpose()?;
    if let Some(password) = &body.password {
        validate_password(password)?;
    }
    let role = body.role;
    let password = body.password;

    let record = services::blocking(services, move |s| -> Result<_, ApiError> {
        let password_hash = password.map(|p| s.passwords.hash(&p)).transpose()?;
        Ok(s.users.update(id, UserChanges { email, password_hash, role })?)
    })
    .await?;

    tracing::info!(admin_id = %admin.user_id, user_id = %record.id, "user updated");
    Ok(Json(ApiResponse::success("user updated", UserSummary::from(&record))))
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentUser(admin): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = parse_id(&id)?;
    if id == admin.user_id {
        return Err(ApiError::bad_request("administrators cannot delete their own account"));
    }

    services.users.remove(id)?;
    tracing::info!(admin_id = %admin.user_id, user_id = %id, "user deleted");
    Ok(Json(ApiResponse::success("user deleted", ())))
}
