//! services/api/src/web/rest.rs
//!
//! Contains the public Axum handlers, the JSON payload types shared with the
//! admin endpoints, and the master definition for the OpenAPI specification.

use crate::web::{admin, auth, countdown, response::port_error_response, state::AppState};
use advent_calendar_core::domain::{
    CalendarView, Countdown, Gift, GiftLike, GiftStatus, GiftView, PublicSettings,
};
use advent_calendar_core::ports::PortResult;
use advent_calendar_core::time::{format_timestamp, parse_timestamp};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        get_settings_handler,
        get_calendar_handler,
        open_gift_handler,
        toggle_like_handler,
        countdown::countdown_stream_handler,
        auth::login_handler,
        auth::change_password_handler,
        admin::save_settings_handler,
        admin::regenerate_handler,
        admin::fill_missing_handler,
        admin::prune_handler,
        admin::update_gift_handler,
        admin::delete_gift_handler,
        admin::catalog_report_handler,
    ),
    components(
        schemas(
            SettingsPayload, GiftPayload, GiftLikePayload, CalendarResponse, CalendarGift,
            GiftStatusPayload, CountdownPayload, countdown::CountdownTick,
            auth::LoginRequest, auth::LoginResponse, auth::ChangePasswordRequest,
            auth::ChangePasswordResponse,
            admin::RegenerateRequest, admin::RegenerateResponse, admin::MaxDaysRequest,
            admin::GiftIdsResponse, admin::UpdateGiftRequest, admin::CatalogReportResponse,
        )
    ),
    tags(
        (name = "Advent Calendar API", description = "Date-gated daily gifts with an admin editor.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// One calendar entry as it travels over HTTP.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GiftPayload {
    pub id: u32,
    pub order: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub opened: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opened_at: Option<String>,
}

impl From<&Gift> for GiftPayload {
    fn from(gift: &Gift) -> Self {
        Self {
            id: gift.id,
            order: gift.order,
            title: gift.title.clone(),
            text: gift.text.clone(),
            image: gift.image.clone(),
            opened: gift.opened,
            opened_at: gift.opened_at.as_ref().map(format_timestamp),
        }
    }
}

impl GiftPayload {
    fn into_domain(self) -> PortResult<Gift> {
        Ok(Gift {
            id: self.id,
            order: self.order,
            title: self.title,
            text: self.text,
            image: self.image.filter(|url| !url.trim().is_empty()),
            opened: self.opened,
            opened_at: self.opened_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GiftLikePayload {
    pub gift_id: u32,
    pub liked: bool,
    pub liked_at: String,
}

impl From<&GiftLike> for GiftLikePayload {
    fn from(like: &GiftLike) -> Self {
        Self {
            gift_id: like.gift_id,
            liked: like.liked,
            liked_at: format_timestamp(&like.liked_at),
        }
    }
}

impl GiftLikePayload {
    fn into_domain(self) -> PortResult<GiftLike> {
        Ok(GiftLike {
            gift_id: self.gift_id,
            liked: self.liked,
            liked_at: parse_timestamp(&self.liked_at)?,
        })
    }
}

/// The calendar document without the admin password. Returned by
/// `GET /api/settings` and accepted by `PUT /api/admin/settings`.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPayload {
    pub christmas_date: String,
    pub gifts: Vec<GiftPayload>,
    #[serde(default)]
    pub likes: Vec<GiftLikePayload>,
    #[serde(default)]
    pub final_message: String,
    #[serde(default)]
    pub development_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulated_date: Option<String>,
}

impl From<&PublicSettings> for SettingsPayload {
    fn from(settings: &PublicSettings) -> Self {
        Self {
            christmas_date: format_timestamp(&settings.christmas_date),
            gifts: settings.gifts.iter().map(GiftPayload::from).collect(),
            likes: settings.likes.iter().map(GiftLikePayload::from).collect(),
            final_message: settings.final_message.clone(),
            development_mode: settings.development_mode,
            simulated_date: settings.simulated_date.as_ref().map(format_timestamp),
        }
    }
}

impl SettingsPayload {
    pub fn into_domain(self) -> PortResult<PublicSettings> {
        Ok(PublicSettings {
            christmas_date: parse_timestamp(&self.christmas_date)?,
            gifts: self
                .gifts
                .into_iter()
                .map(GiftPayload::into_domain)
                .collect::<PortResult<_>>()?,
            likes: self
                .likes
                .into_iter()
                .map(GiftLikePayload::into_domain)
                .collect::<PortResult<_>>()?,
            final_message: self.final_message,
            development_mode: self.development_mode,
            simulated_date: self
                .simulated_date
                .as_deref()
                .filter(|raw| !raw.trim().is_empty())
                .map(parse_timestamp)
                .transpose()?,
        })
    }
}

#[derive(Serialize, ToSchema, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GiftStatusPayload {
    Locked,
    Unlockable,
    Opened,
}

impl From<GiftStatus> for GiftStatusPayload {
    fn from(status: GiftStatus) -> Self {
        match status {
            GiftStatus::Locked => Self::Locked,
            GiftStatus::Unlockable => Self::Unlockable,
            GiftStatus::Opened => Self::Opened,
        }
    }
}

#[derive(Serialize, ToSchema, Clone, Copy, Debug)]
pub struct CountdownPayload {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl From<Countdown> for CountdownPayload {
    fn from(c: Countdown) -> Self {
        Self {
            days: c.days,
            hours: c.hours,
            minutes: c.minutes,
            seconds: c.seconds,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CalendarGift {
    pub id: u32,
    pub order: u32,
    pub title: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub status: GiftStatusPayload,
    pub empty: bool,
    pub liked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opened_at: Option<String>,
}

impl From<&GiftView> for CalendarGift {
    fn from(view: &GiftView) -> Self {
        Self {
            id: view.gift.id,
            order: view.gift.order,
            title: view.gift.title.clone(),
            text: view.gift.text.clone(),
            image: view.gift.image.clone(),
            status: view.status.into(),
            empty: view.empty,
            liked: view.liked,
            opened_at: view.gift.opened_at.as_ref().map(format_timestamp),
        }
    }
}

/// Everything the calendar page renders, computed at the effective now.
#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    pub now: String,
    pub christmas_date: String,
    pub countdown: CountdownPayload,
    pub is_target_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_message: Option<String>,
    pub development_mode: bool,
    pub gifts: Vec<CalendarGift>,
}

impl From<&CalendarView> for CalendarResponse {
    fn from(view: &CalendarView) -> Self {
        Self {
            now: format_timestamp(&view.now),
            christmas_date: format_timestamp(&view.christmas_date),
            countdown: view.countdown.into(),
            is_target_day: view.is_target_day,
            final_message: view.final_message.clone(),
            development_mode: view.development_mode,
            gifts: view.gifts.iter().map(CalendarGift::from).collect(),
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Load the calendar document. The admin password is never included.
#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Current settings", body = SettingsPayload),
        (status = 500, description = "Document could not be read")
    )
)]
pub async fn get_settings_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let settings = app_state
        .calendar
        .load()
        .await
        .map_err(|e| port_error_response("Failed to load settings", e))?;
    Ok(Json(SettingsPayload::from(&settings)))
}

/// The calendar as of the effective now: countdown, lock state of every gift,
/// and the final message once the target date is reached.
#[utoipa::path(
    get,
    path = "/api/calendar",
    responses(
        (status = 200, description = "Calendar view", body = CalendarResponse),
        (status = 500, description = "Document could not be read")
    )
)]
pub async fn get_calendar_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let view = app_state
        .calendar
        .calendar()
        .await
        .map_err(|e| port_error_response("Failed to load calendar", e))?;
    Ok(Json(CalendarResponse::from(&view)))
}

/// Open a gift. Opening an already opened gift keeps its first timestamp.
#[utoipa::path(
    post,
    path = "/api/gifts/{id}/open",
    params(("id" = u32, Path, description = "Gift id")),
    responses(
        (status = 204, description = "Gift opened"),
        (status = 404, description = "Unknown gift"),
        (status = 409, description = "Gift is still locked"),
        (status = 500, description = "Document could not be written")
    )
)]
pub async fn open_gift_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    app_state
        .calendar
        .mark_opened(id)
        .await
        .map_err(|e| port_error_response("Failed to open gift", e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle the like flag of a gift and return the resulting record.
#[utoipa::path(
    post,
    path = "/api/gifts/{id}/like",
    params(("id" = u32, Path, description = "Gift id")),
    responses(
        (status = 200, description = "Like toggled", body = GiftLikePayload),
        (status = 404, description = "Unknown gift"),
        (status = 500, description = "Document could not be written")
    )
)]
pub async fn toggle_like_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let like = app_state
        .calendar
        .toggle_like(id)
        .await
        .map_err(|e| port_error_response("Failed to save like", e))?;
    Ok(Json(GiftLikePayload::from(&like)))
}
