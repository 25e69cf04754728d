//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting the admin routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{error, warn};

use crate::web::state::AppState;

/// Header carrying the plaintext admin password.
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// The password a request authenticated with, for handlers that write the
/// whole document back.
#[derive(Clone, Debug)]
pub struct AdminPassword(pub String);

/// Middleware that checks the admin password header against the stored one.
///
/// If valid, inserts the password into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let password = req
        .headers()
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?
        .to_string();

    let authenticated = state.calendar.authenticate(&password).await.map_err(|e| {
        error!("Failed to check admin password: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if !authenticated {
        warn!("Rejected admin request to {}", req.uri().path());
        return Err(StatusCode::UNAUTHORIZED);
    }

    req.extensions_mut().insert(AdminPassword(password));
    Ok(next.run(req).await)
}
