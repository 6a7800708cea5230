//! Click log entity: the durable record that a device claimed a click.

use chrono::{DateTime, Utc};

/// One accepted click for a `(page, tag, device_id)` triple.
///
/// At most one exists per triple; the storage layer enforces this with a
/// unique constraint. Rows are never updated or deleted and serve as the
/// audit trail from which counters can be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickLog {
    pub id: i64,
    pub page: String,
    pub tag: String,
    pub device_id: String,
    pub country: String,
    pub source_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for claiming a click.
///
/// Built by the tracking service after validation, so every field is
/// already trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClickLog {
    pub page: String,
    pub tag: String,
    pub device_id: String,
    pub country: String,
    pub source_address: Option<String>,
}
