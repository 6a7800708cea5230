//! Business logic services for the application layer.

pub mod stats_service;
pub mod tracking_service;

pub use stats_service::StatsService;
pub use tracking_service::{ClickSubmission, TrackingService};
