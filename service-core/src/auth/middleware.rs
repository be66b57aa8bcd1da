use super::{AccessPolicy, AuthorizationGate, CallerIdentity, GateState, JwtService};
use crate::error::AppError;
use crate::outcome::Outcome;
use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::counter;
use std::collections::HashSet;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Require a valid bearer token and attach the caller's identity to the request.
pub async fn authenticate<S>(
    State(state): State<S>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError>
where
    S: AsRef<JwtService> + Clone + Send + Sync + 'static,
{
    let token = bearer_token(req.headers()).ok_or_else(|| {
        AppError::Unauthorized(anyhow::anyhow!("Missing or invalid Authorization header"))
    })?;

    let caller = state.as_ref().verify(token).map_err(|e| {
        tracing::info!(error = %e, "Rejected bearer token");
        e
    })?;

    tracing::Span::current().record("user_id", caller.id.as_str());
    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}

/// Run the authorization gate for routes the policy protects.
///
/// Must be installed with `route_layer` so `MatchedPath` is known, and inside
/// [`authenticate`] so the caller identity is present. A denial answers 403
/// before any extractor or handler runs.
pub async fn authorize<S>(State(state): State<S>, req: Request, next: Next) -> Response
where
    S: AsRef<AccessPolicy> + Clone + Send + Sync + 'static,
{
    let requirement = req
        .extensions()
        .get::<MatchedPath>()
        .and_then(|path| state.as_ref().requirement_for(req.method(), path.as_str()))
        .cloned();

    let Some(requirement) = requirement else {
        return next.run(req).await;
    };

    let no_claims = HashSet::new();
    let caller = req.extensions().get::<CallerIdentity>();
    let claims = caller.map(|c| &c.claims).unwrap_or(&no_claims);

    let mut gate = AuthorizationGate::new();
    match gate.check(&requirement, claims) {
        GateState::Granted => next.run(req).await,
        _ => {
            tracing::warn!(
                user_id = caller.map(|c| c.id.as_str()).unwrap_or("-"),
                resource = %requirement.resource,
                operation = %requirement.operation,
                "Permission denied: missing claim"
            );
            counter!(
                "authorization_denied_total",
                "resource" => requirement.resource.clone(),
                "operation" => requirement.operation.clone()
            )
            .increment(1);
            Outcome::<()>::Forbidden.into_response()
        }
    }
}
