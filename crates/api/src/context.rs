use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};

use storefront_auth::Identity;

use crate::app::errors;

/// Identity resolved by the authorization gate for the current request.
///
/// Only present on operations that declare a role requirement. Extracting it
/// on an undeclared (open) operation is a wiring bug and answers 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub Identity);

impl CurrentUser {
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Identity>() {
            Some(identity) => Ok(CurrentUser(identity.clone())),
            None => {
                tracing::error!(path = %parts.uri.path(), "handler expects an identity but the route declares no role requirement");
                Err(errors::unauthenticated().into_response())
            }
        }
    }
}
