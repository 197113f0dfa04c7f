//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: account storage, password hashing, session authority
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and the response envelope
//! - `errors.rs`: gate rejections and business error responses

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, Extension, Router};

use storefront_auth::{AuthorizationGate, SessionError, TokenCodec};

use crate::{authz, config::ServerConfig, middleware};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Assemble the router around already-built services and gate.
pub fn build_router(services: Arc<AppServices>, gate: AuthorizationGate) -> Router {
    routes::router()
        .route_layer(from_fn_with_state(gate.clone(), middleware::authorization_gate))
        .layer(Extension(services))
        .layer(Extension(gate))
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ServerConfig) -> Result<Router, SessionError> {
    let services = Arc::new(AppServices::new(config)?);
    let codec = TokenCodec::new(Arc::new(config.auth.clone()));
    let gate = AuthorizationGate::new(codec, Arc::new(authz::access_policy()));

    tracing::info!(protected_operations = gate.policy().len(), "authorization gate ready");
    Ok(build_router(services, gate))
}
