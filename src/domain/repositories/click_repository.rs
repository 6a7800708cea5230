//! Repository trait for the click ledger and aggregate counters.

use crate::domain::entities::{ClickCounter, ClickLog, CounterDrift, NewClickLog};
use crate::error::AppError;
use async_trait::async_trait;

/// Result of claiming a click in the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The claim created the ledger row and the counter was incremented in
    /// the same transaction. `count` is the post-increment value.
    Claimed { log: ClickLog, count: i64 },
    /// A ledger row for the same `(page, tag, device_id)` already exists.
    /// `count` is the current aggregate.
    Duplicate { count: i64 },
}

/// Storage contract for click tracking.
///
/// Implementations must provide two atomic primitives:
///
/// - a conditional insert enforcing uniqueness on `(page, tag, device_id)`,
///   so of N concurrent identical claims exactly one succeeds
/// - an atomic upsert-increment of the `(page, tag)` counter with no lost
///   updates
///
/// and must apply both writes of [`ClickRepository::claim_click`] as one
/// transaction, so a ledger row never exists without its increment.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryClickRepository`] - in-process, for tests
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Claims a click and, if the claim is new, increments its counter.
    ///
    /// A uniqueness conflict is reported as [`ClaimOutcome::Duplicate`],
    /// never as an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] when storage cannot be reached and
    /// [`AppError::Internal`] on other database errors. In both cases
    /// nothing is persisted.
    async fn claim_click(&self, claim: NewClickLog) -> Result<ClaimOutcome, AppError>;

    /// Finds the counter for a `(page, tag)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on
    /// database errors.
    async fn find_counter(&self, page: &str, tag: &str) -> Result<Option<ClickCounter>, AppError>;

    /// Lists counters for one page ordered by count descending.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on
    /// database errors.
    async fn list_counters_for_page(&self, page: &str) -> Result<Vec<ClickCounter>, AppError>;

    /// Lists all counters ordered by page ascending, then count descending.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on
    /// database errors.
    async fn list_counters(&self) -> Result<Vec<ClickCounter>, AppError>;

    /// Counts click logs for a `(page, tag)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on
    /// database errors.
    async fn count_click_logs(&self, page: &str, tag: &str) -> Result<i64, AppError>;

    /// Rewrites every counter to the number of click logs behind it and
    /// returns the counters that differed.
    ///
    /// Click logs are the source of truth. Claims are blocked while the
    /// repair runs.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on
    /// database errors.
    async fn reconcile_counters(&self) -> Result<Vec<CounterDrift>, AppError>;

    /// Checks that storage is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] when it is not.
    async fn ping(&self) -> Result<(), AppError>;
}
