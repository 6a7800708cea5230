//! Cross-origin access for landing pages served from other hosts.

use axum::http::{HeaderValue, Method, header, header::InvalidHeaderValue};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Creates the CORS layer.
///
/// With `allowed_origin` set only that exact origin may call the API,
/// otherwise any origin may. Preflight requests are answered by the layer.
///
/// # Errors
///
/// Returns an error if the origin is not a valid header value.
pub fn layer(allowed_origin: Option<&str>) -> Result<CorsLayer, InvalidHeaderValue> {
    let origin = match allowed_origin {
        Some(origin) => AllowOrigin::exact(HeaderValue::from_str(origin)?),
        None => AllowOrigin::any(),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_origin() {
        assert!(layer(Some("https://landing.example\n")).is_err());
        assert!(layer(Some("https://landing.example")).is_ok());
        assert!(layer(None).is_ok());
    }
}
