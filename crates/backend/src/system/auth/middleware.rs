use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::shared::app_state::AppState;
use crate::shared::error::ErpError;

/// Middleware that requires valid JWT authentication
///
/// Name and role are re-read from the store, so a role change applies to the
/// next request. Tokens of deleted or blocked employees are rejected.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ErpError> {
    // Extract Authorization header
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(ErpError::Unauthorized)?;

    // Validate token
    let mut claims = super::jwt::validate_token(&state.auth, token)
        .map_err(|_| ErpError::Unauthorized)?;

    {
        let store = state.store.read().await;
        let employee = store
            .employees
            .get_by_ref(&claims.sub)
            .ok_or(ErpError::Unauthorized)?;
        if employee.is_blocked {
            return Err(ErpError::AccountBlocked);
        }
        claims.name = employee.base.description.clone();
        claims.role = employee.role;
    }

    // Add claims to request extensions for use in handlers
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
