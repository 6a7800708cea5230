//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`      - Health check (database)
//! - `POST /api/track`   - Click submission (rate limited)
//! - `GET  /api/stats`   - Aggregate click totals
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Landing pages on other origins
//! - **Rate limiting** - Per-IP token bucket on `/api/track`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{cors, rate_limit, tracing};
use crate::config::Config;
use crate::state::AppState;
use anyhow::Result;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// When `config.behind_proxy` is set, rate limiting reads the client IP from
/// forwarding headers instead of the peer socket address.
///
/// # Errors
///
/// Returns an error if the configured CORS origin is not a valid header value.
pub fn app_router(state: AppState, config: &Config) -> Result<NormalizePath<Router>> {
    let burst = config.track_rate_limit_burst;
    let replenish = config.track_rate_limit_replenish_secs;

    let track_router = if config.behind_proxy {
        api::routes::track_routes().layer(rate_limit::proxy_layer(burst, replenish))
    } else {
        api::routes::track_routes().layer(rate_limit::peer_layer(burst, replenish))
    };

    let api_router = Router::new()
        .merge(track_router)
        .merge(api::routes::stats_routes());

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(cors::layer(config.cors_allowed_origin.as_deref())?)
        .layer(tracing::layer());

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
