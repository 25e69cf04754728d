//! services/api/src/web/response.rs
//!
//! Maps core errors onto HTTP responses.

use advent_calendar_core::ports::PortError;
use axum::http::StatusCode;
use tracing::{error, warn};

/// Logs the underlying cause and turns it into a status plus a message that
/// is safe to show to the caller. Server-side failures only carry `context`.
pub fn port_error_response(context: &str, e: PortError) -> (StatusCode, String) {
    let status = match &e {
        PortError::NotFound(_) => StatusCode::NOT_FOUND,
        PortError::InvalidDate(_) | PortError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        PortError::Locked(_) => StatusCode::CONFLICT,
        PortError::Unauthorized => StatusCode::UNAUTHORIZED,
        PortError::Io(_) | PortError::Corrupt(_) | PortError::Unexpected(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status.is_server_error() {
        error!("{}: {:?}", context, e);
        (status, context.to_string())
    } else {
        warn!("{}: {}", context, e);
        (status, format!("{}: {}", context, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_hide_their_cause() {
        let (status, body) =
            port_error_response("Failed to save", PortError::Io("/secret/path: denied".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Failed to save");
    }

    #[test]
    fn client_errors_explain_themselves() {
        let (status, body) =
            port_error_response("Failed to open gift", PortError::Locked("day 3".into()));
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body.contains("day 3"));

        let (status, _) = port_error_response("x", PortError::NotFound("gift".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = port_error_response("x", PortError::InvalidInput("maxDays".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
