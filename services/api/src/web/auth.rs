//! services/api/src/web/auth.rs
//!
//! Admin password check and password change endpoints.
//!
//! There are no sessions: the admin panel keeps the password it logged in with
//! and sends it on every admin request (see `middleware::require_admin`).

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;
use crate::web::{response::port_error_response, state::AppState};

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub authenticated: bool,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Serialize, ToSchema)]
pub struct ChangePasswordResponse {
    pub changed: bool,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/admin/login - Check the admin password
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Whether the password matched", body = LoginResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let authenticated = state
        .calendar
        .authenticate(&req.password)
        .await
        .map_err(|e| port_error_response("Authentication error", e))?;

    if !authenticated {
        warn!("Rejected admin login attempt");
    }
    Ok(Json(LoginResponse { authenticated }))
}

/// POST /api/admin/password - Replace the admin password
#[utoipa::path(
    post,
    path = "/api/admin/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Whether the password was changed", body = ChangePasswordResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn change_password_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let changed = state
        .calendar
        .change_password(&req.old_password, &req.new_password)
        .await
        .map_err(|e| port_error_response("Failed to change password", e))?;

    Ok(Json(ChangePasswordResponse { changed }))
}
