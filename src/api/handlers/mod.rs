//! HTTP request handlers.

pub mod health;
pub mod stats;
pub mod track;

pub use health::health_handler;
pub use stats::stats_handler;
pub use track::track_handler;
