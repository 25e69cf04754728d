//! services/api/src/web/countdown.rs
//!
//! Server-sent countdown ticks for the calendar page.
//!
//! Each tick re-reads the document, so edits to the target date or to the
//! simulated clock show up on the next second without reconnecting.

use crate::web::{rest::CountdownPayload, state::AppState};
use advent_calendar_core::domain::CountdownSnapshot;
use advent_calendar_core::time::format_timestamp;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use serde::Serialize;
use std::{convert::Infallible, sync::Arc, time::Duration};
use tracing::{error, info};
use utoipa::ToSchema;

const TICK: Duration = Duration::from_secs(1);

/// Payload of one `countdown` event.
#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CountdownTick {
    pub now: String,
    pub countdown: CountdownPayload,
    pub is_target_day: bool,
}

impl From<CountdownSnapshot> for CountdownTick {
    fn from(snapshot: CountdownSnapshot) -> Self {
        Self {
            now: format_timestamp(&snapshot.now),
            countdown: snapshot.countdown.into(),
            is_target_day: snapshot.is_target_day,
        }
    }
}

/// Stream a `countdown` event every second.
#[utoipa::path(
    get,
    path = "/api/countdown/stream",
    responses(
        (status = 200, description = "text/event-stream of `countdown` events", body = CountdownTick)
    )
)]
pub async fn countdown_stream_handler(
    State(app_state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("Countdown stream opened");

    let stream = async_stream::stream! {
        let mut ticker = tokio::time::interval(TICK);
        loop {
            ticker.tick().await;

            let snapshot = match app_state.calendar.countdown().await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    error!("Countdown stream stopped: {:?}", e);
                    break;
                }
            };

            match Event::default().event("countdown").json_data(CountdownTick::from(snapshot)) {
                Ok(event) => yield Ok(event),
                Err(e) => {
                    error!("Failed to encode countdown event: {:?}", e);
                    break;
                }
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
