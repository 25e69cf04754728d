//! services/api/src/web/admin.rs
//!
//! Admin-only handlers for editing the calendar. All routes here sit behind
//! `middleware::require_admin`.

use crate::web::{
    middleware::AdminPassword,
    response::port_error_response,
    rest::SettingsPayload,
    state::AppState,
};
use advent_calendar_core::domain::{CatalogReport, Settings};
use advent_calendar_core::time::parse_timestamp;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateRequest {
    /// New target date; RFC 3339 or a naive date-time read as UTC.
    pub christmas_date: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateResponse {
    pub gift_count: u32,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaxDaysRequest {
    pub max_days: u32,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GiftIdsResponse {
    pub gift_ids: Vec<u32>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateGiftRequest {
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    pub max_days: Option<u32>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogReportResponse {
    pub max_days: u32,
    pub total_gifts: usize,
    pub opened_gifts: usize,
    pub liked_gifts: usize,
    pub missing_days: Vec<u32>,
    pub extra_gift_ids: Vec<u32>,
    pub duplicate_orders: Vec<u32>,
}

impl From<CatalogReport> for CatalogReportResponse {
    fn from(report: CatalogReport) -> Self {
        Self {
            max_days: report.max_days,
            total_gifts: report.total_gifts,
            opened_gifts: report.opened_gifts,
            liked_gifts: report.liked_gifts,
            missing_days: report.missing_days,
            extra_gift_ids: report.extra_gift_ids,
            duplicate_orders: report.duplicate_orders,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// Replace the whole calendar document. The stored password is kept.
#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = SettingsPayload,
    responses(
        (status = 204, description = "Settings saved"),
        (status = 400, description = "A timestamp could not be parsed or gift ids repeat"),
        (status = 401, description = "Missing or wrong admin password"),
        (status = 500, description = "Document could not be written")
    ),
    params(("x-admin-password" = String, Header, description = "Admin password"))
)]
pub async fn save_settings_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(AdminPassword(password)): Extension<AdminPassword>,
    Json(payload): Json<SettingsPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let public = payload
        .into_domain()
        .map_err(|e| port_error_response("Invalid settings", e))?;

    app_state
        .calendar
        .save(Settings::from_public(public, password))
        .await
        .map_err(|e| port_error_response("Failed to save settings", e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace every gift with empty ones counting down to a new target date.
#[utoipa::path(
    post,
    path = "/api/admin/gifts/regenerate",
    request_body = RegenerateRequest,
    responses(
        (status = 200, description = "Gifts regenerated", body = RegenerateResponse),
        (status = 400, description = "Target date is not in the future"),
        (status = 401, description = "Missing or wrong admin password"),
        (status = 500, description = "Document could not be written")
    ),
    params(("x-admin-password" = String, Header, description = "Admin password"))
)]
pub async fn regenerate_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<RegenerateRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let christmas_date = parse_timestamp(&req.christmas_date)
        .map_err(|e| port_error_response("Invalid target date", e))?;

    let gift_count = app_state
        .calendar
        .regenerate(christmas_date)
        .await
        .map_err(|e| port_error_response("Failed to generate gifts", e))?;
    Ok(Json(RegenerateResponse { gift_count }))
}

/// Create an empty gift for every day in `1..=maxDays` that has none.
#[utoipa::path(
    post,
    path = "/api/admin/gifts/fill-missing",
    request_body = MaxDaysRequest,
    responses(
        (status = 200, description = "Ids of the created gifts", body = GiftIdsResponse),
        (status = 400, description = "maxDays is larger than a year, or no gift ids are left"),
        (status = 401, description = "Missing or wrong admin password"),
        (status = 500, description = "Document could not be written")
    ),
    params(("x-admin-password" = String, Header, description = "Admin password"))
)]
pub async fn fill_missing_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<MaxDaysRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let gift_ids = app_state
        .calendar
        .fill_missing(req.max_days)
        .await
        .map_err(|e| port_error_response("Failed to create missing gifts", e))?;
    Ok(Json(GiftIdsResponse { gift_ids }))
}

/// Delete every gift beyond day `maxDays`, with its like.
#[utoipa::path(
    post,
    path = "/api/admin/gifts/prune",
    request_body = MaxDaysRequest,
    responses(
        (status = 200, description = "Ids of the removed gifts", body = GiftIdsResponse),
        (status = 401, description = "Missing or wrong admin password"),
        (status = 500, description = "Document could not be written")
    ),
    params(("x-admin-password" = String, Header, description = "Admin password"))
)]
pub async fn prune_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<MaxDaysRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let gift_ids = app_state
        .calendar
        .prune_beyond(req.max_days)
        .await
        .map_err(|e| port_error_response("Failed to remove extra gifts", e))?;
    Ok(Json(GiftIdsResponse { gift_ids }))
}

/// Replace a gift's title, text and image.
#[utoipa::path(
    put,
    path = "/api/admin/gifts/{id}",
    request_body = UpdateGiftRequest,
    responses(
        (status = 204, description = "Gift updated"),
        (status = 401, description = "Missing or wrong admin password"),
        (status = 404, description = "Unknown gift"),
        (status = 500, description = "Document could not be written")
    ),
    params(
        ("id" = u32, Path, description = "Gift id"),
        ("x-admin-password" = String, Header, description = "Admin password")
    )
)]
pub async fn update_gift_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(req): Json<UpdateGiftRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    app_state
        .calendar
        .update_gift(id, req.title, req.text, req.image)
        .await
        .map_err(|e| port_error_response("Failed to update gift", e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a gift and its like. Unknown ids are not an error.
#[utoipa::path(
    delete,
    path = "/api/admin/gifts/{id}",
    responses(
        (status = 204, description = "Gift deleted"),
        (status = 401, description = "Missing or wrong admin password"),
        (status = 500, description = "Document could not be written")
    ),
    params(
        ("id" = u32, Path, description = "Gift id"),
        ("x-admin-password" = String, Header, description = "Admin password")
    )
)]
pub async fn delete_gift_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    app_state
        .calendar
        .delete_gift(id)
        .await
        .map_err(|e| port_error_response("Failed to delete gift", e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Missing days, extra gifts and duplicate day-indices for a planned length.
/// Without `maxDays` the current number of gifts is used.
#[utoipa::path(
    get,
    path = "/api/admin/catalog",
    responses(
        (status = 200, description = "Catalog report", body = CatalogReportResponse),
        (status = 400, description = "maxDays is larger than a year"),
        (status = 401, description = "Missing or wrong admin password"),
        (status = 500, description = "Document could not be read")
    ),
    params(
        ("maxDays" = Option<u32>, Query, description = "Planned number of days"),
        ("x-admin-password" = String, Header, description = "Admin password")
    )
)]
pub async fn catalog_report_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<CatalogQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let report = app_state
        .calendar
        .catalog_report(query.max_days)
        .await
        .map_err(|e| port_error_response("Failed to build catalog report", e))?;
    Ok(Json(CatalogReportResponse::from(report)))
}
