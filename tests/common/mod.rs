#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use offer_click_tracker::api;
use offer_click_tracker::domain::geo_policy::GeoPolicy;
use offer_click_tracker::infrastructure::persistence::{MemoryClickRepository, PgClickRepository};
use offer_click_tracker::state::AppState;
use serde_json::{Value, json};
use sqlx::PgPool;
use std::sync::Arc;

pub fn create_test_state(repository: Arc<MemoryClickRepository>) -> AppState {
    AppState::new(repository, GeoPolicy::default(), false)
}

/// `/api/track` and `/api/stats` over an in-memory store, without rate limiting.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            api::routes::track_routes().merge(api::routes::stats_routes()),
        )
        .with_state(state)
}

pub fn create_test_server() -> (TestServer, Arc<MemoryClickRepository>) {
    let repository = Arc::new(MemoryClickRepository::new());
    let app = api_router(create_test_state(repository.clone()));

    (TestServer::new(app).unwrap(), repository)
}

/// Same routes over PostgreSQL, for tests that need the real ledger.
pub fn create_pg_test_server(pool: PgPool) -> TestServer {
    let repository = Arc::new(PgClickRepository::new(Arc::new(pool)));
    let state = AppState::new(repository, GeoPolicy::default(), false);

    TestServer::new(api_router(state)).unwrap()
}

pub fn click(page: &str, tag: &str, country: &str, device_id: &str) -> Value {
    json!({
        "page": page,
        "tag": tag,
        "country": country,
        "deviceId": device_id,
    })
}
