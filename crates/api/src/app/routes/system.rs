use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};

use storefront_auth::{AuthorizationGate, Role};

use crate::app::dto::ApiResponse;
use crate::app::routes::auth::bearer_token;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(status))
        .route("/api/admin/access-policy", get(access_policy))
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Reports whether the presented bearer token is currently valid. Always 200.
pub async fn status(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Json<Value> {
    let identity = bearer_token(&headers)
        .ok()
        .and_then(|token| services.sessions.resolve_identity(token).ok());

    match identity {
        Some(identity) => Json(json!({ "status": "valid", "userId": identity.user_id.to_string() })),
        None => Json(json!({ "status": "invalid" })),
    }
}

#[derive(Debug, Serialize)]
pub struct PolicyEntry {
    pub method: String,
    pub route: String,
    pub roles: Vec<Role>,
}

pub async fn access_policy(
    Extension(gate): Extension<AuthorizationGate>,
) -> Json<ApiResponse<Vec<PolicyEntry>>> {
    let entries: Vec<PolicyEntry> = gate
        .policy()
        .operations()
        .into_iter()
        .map(|(op, requirement)| PolicyEntry {
            method: op.method().to_string(),
            route: op.route().to_string(),
            roles: requirement.roles().collect(),
        })
        .collect();
    Json(ApiResponse::success("ok", entries))
}
