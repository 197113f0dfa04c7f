use axum::Router;

pub mod auth;
pub mod system;
pub mod users;

/// Every route, registered with its full path so the matched template is
/// exactly the one declared in the access policy.
pub fn router() -> Router {
    Router::new()
        .merge(system::router())
        .merge(auth::router())
        .merge(users::router())
}
