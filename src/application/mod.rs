//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::ClickRepository`]
//! trait and provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::tracking_service::TrackingService`] - click submission and counter repair
//! - [`services::stats_service::StatsService`] - read-only aggregate queries

pub mod services;
