//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::{StatsService, TrackingService};
use crate::domain::geo_policy::GeoPolicy;
use crate::domain::repositories::ClickRepository;

/// State shared by all handlers.
///
/// Services are built over a `dyn ClickRepository` so the same router runs
/// against PostgreSQL in production and the in-memory store in tests.
#[derive(Clone)]
pub struct AppState {
    pub tracking_service: Arc<TrackingService<dyn ClickRepository>>,
    pub stats_service: Arc<StatsService<dyn ClickRepository>>,
    /// Read the client address from forwarding headers.
    pub behind_proxy: bool,
}

impl AppState {
    /// Builds services over one repository.
    pub fn new(
        repository: Arc<dyn ClickRepository>,
        geo_policy: GeoPolicy,
        behind_proxy: bool,
    ) -> Self {
        Self {
            tracking_service: Arc::new(TrackingService::new(
                repository.clone(),
                Arc::new(geo_policy),
            )),
            stats_service: Arc::new(StatsService::new(repository)),
            behind_proxy,
        }
    }
}
