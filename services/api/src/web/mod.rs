pub mod admin;
pub mod auth;
pub mod countdown;
pub mod middleware;
pub mod response;
pub mod rest;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

pub use middleware::require_admin;
pub use state::AppState;

/// Builds the `/api` router. CORS, tracing and Swagger UI are layered on by the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/settings", get(rest::get_settings_handler))
        .route("/api/calendar", get(rest::get_calendar_handler))
        .route("/api/countdown/stream", get(countdown::countdown_stream_handler))
        .route("/api/gifts/{id}/open", post(rest::open_gift_handler))
        .route("/api/gifts/{id}/like", post(rest::toggle_like_handler))
        .route("/api/admin/login", post(auth::login_handler))
        .route("/api/admin/password", post(auth::change_password_handler));

    // Admin routes (password header required)
    let admin_routes = Router::new()
        .route("/api/admin/settings", put(admin::save_settings_handler))
        .route("/api/admin/catalog", get(admin::catalog_report_handler))
        .route("/api/admin/gifts/regenerate", post(admin::regenerate_handler))
        .route("/api/admin/gifts/fill-missing", post(admin::fill_missing_handler))
        .route("/api/admin/gifts/prune", post(admin::prune_handler))
        .route(
            "/api/admin/gifts/{id}",
            put(admin::update_gift_handler).delete(admin::delete_gift_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_admin,
        ));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(app_state)
}
