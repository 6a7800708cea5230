//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Creates a per-peer rate limiter for click submission.
///
/// # Limits
///
/// - **Rate**: one token every `replenish_secs` seconds
/// - **Burst**: `burst` requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Keyed by the socket peer address. Requires the server to be started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
///
/// # Panics
///
/// Panics if `burst` or `replenish_secs` is zero. [`crate::config::Config`]
/// rejects both at startup.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/track", post(track_handler))
///     .layer(rate_limit::peer_layer(30, 1));
/// ```
pub fn peer_layer(
    burst: u32,
    replenish_secs: u64,
) -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(replenish_secs)
            .burst_size(burst)
            .finish()
            .expect("rate limit burst and period must be non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Creates a rate limiter keyed by the forwarded client address.
///
/// Reads `X-Forwarded-For`, `X-Real-IP` and `Forwarded` before falling back
/// to the peer address. Enable only behind a trusted reverse proxy, since
/// clients can set these headers themselves.
///
/// # Panics
///
/// Panics if `burst` or `replenish_secs` is zero.
pub fn proxy_layer(
    burst: u32,
    replenish_secs: u64,
) -> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_second(replenish_secs)
            .burst_size(burst)
            .finish()
            .expect("rate limit burst and period must be non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
