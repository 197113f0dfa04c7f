use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use storefront_auth::{DirectoryError, GateRejection, PasswordError, SessionError};

use crate::app::dto::ApiResponse;

/// Body text for every "who are you" failure at the gate. Malformed, forged
/// and expired tokens must be indistinguishable to the client.
pub const UNAUTHENTICATED_MESSAGE: &str = "unauthenticated";
pub const FORBIDDEN_MESSAGE: &str = "insufficient permissions";

/// Machine-readable rejection body: a single `message` field.
pub fn gate_body(message: &str) -> String {
    json!({ "message": message }).to_string()
}

fn gate_response(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(json!({ "message": message }))).into_response()
}

pub fn unauthenticated() -> Response {
    gate_response(StatusCode::UNAUTHORIZED, UNAUTHENTICATED_MESSAGE)
}

pub fn gate_rejection(rejection: &GateRejection) -> Response {
    if rejection.is_unauthenticated() {
        unauthenticated()
    } else {
        gate_response(StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE)
    }
}

/// Business error codes carried in the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ParamError,
    Unauthorized,
    Forbidden,
    NotFound,
    EmailAlreadyExists,
    InvalidPassword,
    SystemError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ParamError => "400",
            ErrorCode::Unauthorized => "401",
            ErrorCode::Forbidden => "403",
            ErrorCode::NotFound => "404",
            ErrorCode::EmailAlreadyExists => "USER_001",
            ErrorCode::InvalidPassword => "USER_002",
            ErrorCode::SystemError => "500",
        }
    }
}

/// Error returned by business handlers, rendered as an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::ParamError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ErrorCode::NotFound, message)
    }

    /// Internal failure; the detail is logged, never returned.
    pub fn internal(detail: impl core::fmt::Display) -> Self {
        tracing::error!(error = %detail, "internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::SystemError, "internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body: ApiResponse<()> = ApiResponse::error(self.message, self.code.as_str());
        (self.status, axum::Json(body)).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidCredentials => ApiError::unauthorized(err.to_string()),
            SessionError::UserNotFound => ApiError::not_found(err.to_string()),
            SessionError::EmailTaken(_) => {
                ApiError::new(StatusCode::CONFLICT, ErrorCode::EmailAlreadyExists, err.to_string())
            }
            SessionError::Validation(msg) => ApiError::bad_request(msg),
            SessionError::WeakPassword => {
                ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidPassword, err.to_string())
            }
            // One message for every token failure.
            SessionError::Token(_) => ApiError::unauthorized("invalid or expired token"),
            SessionError::Directory(e) => ApiError::internal(e),
            SessionError::Password(e) => ApiError::internal(e),
        }
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        SessionError::from(err).into()
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::internal(err)
    }
}
