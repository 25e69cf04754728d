//! crates/advent_calendar_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the calendar's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of where the document lives and of the real clock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::domain::Settings;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port and calendar operations.
/// This abstracts away the specific errors from the storage backend.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Gift is still locked: {0}")]
    Locked(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Document I/O failed: {0}")]
    Io(String),
    #[error("Document is corrupt: {0}")]
    Corrupt(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Whole-document storage. There is no partial update: callers always
/// read the entire document and write the entire document back.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Returns `None` when no document has been written yet.
    async fn load(&self) -> PortResult<Option<Settings>>;

    /// Replaces the stored document.
    async fn save(&self, settings: &Settings) -> PortResult<()>;
}

/// Source of the real current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
