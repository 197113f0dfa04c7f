use axum::{
    extract::{MatchedPath, Request, State},
    http::{Method, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use storefront_auth::{AuthorizationGate, GateDecision, OperationId};

use crate::app::errors;

/// Role gate for every routed request.
///
/// Must be installed with `Router::route_layer` so the matched route template
/// is known. Operations without a declared requirement pass through untouched.
/// On success the resolved `Identity` is inserted into request extensions;
/// on rejection the endpoint is never invoked.
pub async fn authorization_gate(
    State(gate): State<AuthorizationGate>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(route) = req.extensions().get::<MatchedPath>().map(|p| p.as_str().to_owned()) else {
        return next.run(req).await;
    };
    let operation = OperationId::new(policy_method(req.method()).as_str(), route);

    let decision = {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        gate.check(&operation, header, Utc::now())
    };

    match decision {
        Ok(GateDecision::Open) => next.run(req).await,
        Ok(GateDecision::Authorized(identity)) => {
            tracing::debug!(
                operation = %operation,
                user_id = %identity.user_id,
                role = %identity.role,
                "request authorized"
            );
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(rejection) => {
            tracing::warn!(
                operation = %operation,
                outcome = rejection.state(),
                reason = %rejection,
                "request rejected by authorization gate"
            );
            errors::gate_rejection(&rejection).into_response()
        }
    }
}

/// Method under which a request is looked up in the access policy.
///
/// axum answers `HEAD` with the `GET` handler, so `HEAD` must be held to the
/// `GET` requirement.
fn policy_method(method: &Method) -> Method {
    if *method == Method::HEAD {
        Method::GET
    } else {
        method.clone()
    }
}
