mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use offer_click_tracker::api::handlers::health_handler;
use offer_click_tracker::infrastructure::persistence::MemoryClickRepository;
use offer_click_tracker::infrastructure::persistence::PgClickRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn health_server() -> (TestServer, Arc<MemoryClickRepository>) {
    let repository = Arc::new(MemoryClickRepository::new());
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(common::create_test_state(repository.clone()));

    (TestServer::new(app).unwrap(), repository)
}

#[tokio::test]
async fn test_health_endpoint_success() {
    let (server, _repo) = health_server();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert!(json.get("version").is_some());
}

#[tokio::test]
async fn test_health_endpoint_degraded() {
    let (server, repo) = health_server();
    repo.set_unavailable(true);

    let response = server.get("/health").await;
    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "error");
}

#[sqlx::test]
async fn test_health_endpoint_on_postgres(pool: PgPool) {
    let repository = Arc::new(PgClickRepository::new(Arc::new(pool)));
    let state = offer_click_tracker::state::AppState::new(
        repository,
        offer_click_tracker::domain::geo_policy::GeoPolicy::default(),
        false,
    );
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();
    let response = server.get("/health").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["checks"]["database"]["status"], "ok");
}
