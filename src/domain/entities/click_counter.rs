//! Aggregate counter entity.

use chrono::{DateTime, Utc};

/// Running total of accepted clicks for a `(page, tag)` pair.
///
/// `country` and `last_click_at` are last-writer-wins metadata; `count` only
/// ever moves through the atomic increment (or a reconciliation reset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickCounter {
    pub page: String,
    pub tag: String,
    pub count: i64,
    pub country: String,
    pub last_click_at: DateTime<Utc>,
}

/// Difference between a stored counter and the number of click logs
/// backing it, as found by reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterDrift {
    pub page: String,
    pub tag: String,
    /// Value the counter held before repair (0 if the row was missing).
    pub recorded: i64,
    /// Number of click logs, which the counter now holds.
    pub actual: i64,
}

impl CounterDrift {
    /// Positive when clicks were lost, negative when over-counted.
    pub fn delta(&self) -> i64 {
        self.actual - self.recorded
    }
}
