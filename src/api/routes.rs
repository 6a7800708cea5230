//! API route configuration.

use crate::api::handlers::{stats_handler, track_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Click submission, rate limited by the caller.
///
/// - `POST /track` - Submit a click
pub fn track_routes() -> Router<AppState> {
    Router::new().route("/track", post(track_handler))
}

/// Read-only statistics.
///
/// - `GET /stats` - Totals by `page` and `tag`
pub fn stats_routes() -> Router<AppState> {
    Router::new().route("/stats", get(stats_handler))
}
