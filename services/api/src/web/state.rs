//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use advent_calendar_core::ports::{Clock, SettingsRepository};
use advent_calendar_core::service::CalendarService;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub calendar: Arc<CalendarService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        repository: Arc<dyn SettingsRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            calendar: Arc::new(CalendarService::new(repository, clock)),
            config,
        }
    }
}
