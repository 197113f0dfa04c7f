use chrono::Utc;
use serde::{Deserialize, Serialize};

use storefront_auth::{Role, Session, UserSummary};

// -------------------------
// Response envelope
// -------------------------

/// Uniform envelope for business endpoints. Gate rejections do not use it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub error: Option<String>,
    pub error_code: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
            error_code: None,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn error(message: impl Into<String>, code: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            error: Some(message.clone()),
            message,
            data: None,
            error_code: Some(code.into()),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}

impl From<Session> for AuthResponse {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            user: session.user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_keeps_null_fields_and_camel_case() {
        let ok = serde_json::to_value(ApiResponse::success("done", 7)).unwrap();
        assert_eq!(ok["success"], json!(true));
        assert_eq!(ok["data"], json!(7));
        assert!(ok.get("errorCode").unwrap().is_null());
        assert!(ok.get("error").unwrap().is_null());
        assert!(ok["timestamp"].as_i64().unwrap() > 0);

        let err = serde_json::to_value(ApiResponse::<()>::error("nope", "USER_001")).unwrap();
        assert_eq!(err["success"], json!(false));
        assert_eq!(err["message"], json!("nope"));
        assert_eq!(err["error"], json!("nope"));
        assert_eq!(err["errorCode"], json!("USER_001"));
        assert!(err.get("data").unwrap().is_null());
    }

    #[test]
    fn create_user_role_defaults_to_user() {
        let req: CreateUserRequest =
            serde_json::from_value(json!({ "email": "a@b.io", "password": "secret" })).unwrap();
        assert_eq!(req.role, Role::User);

        let req: CreateUserRequest =
            serde_json::from_value(json!({ "email": "a@b.io", "password": "secret", "role": "ADMIN" }))
                .unwrap();
        assert_eq!(req.role, Role::Admin);
    }
}
