//! Click submission service: validation, geo policy, claim and increment.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::domain::entities::{CounterDrift, NewClickLog};
use crate::domain::geo_policy::GeoPolicy;
use crate::domain::outcome::{RejectReason, TrackOutcome};
use crate::domain::repositories::{ClaimOutcome, ClickRepository};
use crate::error::AppError;

/// Page, tag and device identifiers: no whitespace or control characters.
static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s\p{Cc}]+$").unwrap());

/// Country codes or names: spaces allowed, control characters not.
static COUNTRY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\p{Cc}]+$").unwrap());

/// A click as submitted by a client, before validation.
///
/// Every field is optional so that a missing field is reported as a
/// `missing_fields` rejection instead of a body parsing error.
#[derive(Debug, Clone, Default, Validate)]
pub struct ClickSubmission {
    #[validate(required, length(min = 1, max = 256), regex(path = "*IDENTIFIER_REGEX"))]
    pub page: Option<String>,

    #[validate(required, length(min = 1, max = 256), regex(path = "*IDENTIFIER_REGEX"))]
    pub tag: Option<String>,

    #[validate(required, length(min = 1, max = 256), regex(path = "*IDENTIFIER_REGEX"))]
    pub device_id: Option<String>,

    #[validate(required, length(min = 1, max = 64), regex(path = "*COUNTRY_REGEX"))]
    pub country: Option<String>,

    /// Transport supplied hint (peer or forwarded address). Not validated.
    pub source_address: Option<String>,
}

impl ClickSubmission {
    /// Trims every field and validates the result.
    ///
    /// Returns `None` when a required field is missing or malformed.
    pub fn into_claim(self) -> Option<NewClickLog> {
        let trimmed = Self {
            page: trim(self.page),
            tag: trim(self.tag),
            device_id: trim(self.device_id),
            country: trim(self.country),
            source_address: trim(self.source_address).filter(|s| !s.is_empty()),
        };

        if let Err(errors) = trimmed.validate() {
            debug!(%errors, "Click submission failed validation");
            return None;
        }

        Some(NewClickLog {
            page: trimmed.page?,
            tag: trimmed.tag?,
            device_id: trimmed.device_id?,
            country: trimmed.country?,
            source_address: trimmed.source_address,
        })
    }
}

fn trim(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// Service deciding whether a click counts.
///
/// Runs each submission through:
///
/// 1. **Validate** - required fields present and well-formed, no storage access
/// 2. **Geo check** - country must pass the [`GeoPolicy`], no storage mutation
/// 3. **Claim + increment** - one repository call, atomic in storage
///
/// Holds no counts or dedup state of its own, so any number of instances can
/// serve the same store.
pub struct TrackingService<R: ClickRepository + ?Sized> {
    repository: Arc<R>,
    geo_policy: Arc<GeoPolicy>,
}

impl<R: ClickRepository + ?Sized> TrackingService<R> {
    /// Creates a new tracking service.
    pub fn new(repository: Arc<R>, geo_policy: Arc<GeoPolicy>) -> Self {
        Self {
            repository,
            geo_policy,
        }
    }

    /// Submits a click.
    ///
    /// Business rejections (missing fields, disallowed country, repeat
    /// device) are returned as [`TrackOutcome::Rejected`], not errors.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] when the
    /// claim could not be written. No partial state is left behind.
    pub async fn submit(&self, submission: ClickSubmission) -> Result<TrackOutcome, AppError> {
        let Some(claim) = submission.into_claim() else {
            record_outcome("missing_fields");
            return Ok(TrackOutcome::rejected(RejectReason::MissingFields, 0));
        };

        if !self.geo_policy.is_allowed(&claim.country) {
            let count = self.current_count(&claim.page, &claim.tag).await;
            debug!(
                page = %claim.page,
                tag = %claim.tag,
                country = %claim.country,
                "Click rejected by geo policy"
            );
            record_outcome("country_not_allowed");
            return Ok(TrackOutcome::rejected(RejectReason::CountryNotAllowed, count));
        }

        let page = claim.page.clone();
        let tag = claim.tag.clone();

        match self.repository.claim_click(claim).await? {
            ClaimOutcome::Claimed { count, .. } => {
                debug!(%page, %tag, count, "Click accepted");
                record_outcome("accepted");
                Ok(TrackOutcome::Accepted { count })
            }
            ClaimOutcome::Duplicate { count } => {
                debug!(%page, %tag, count, "Repeat click rejected");
                record_outcome("already_clicked");
                Ok(TrackOutcome::rejected(RejectReason::AlreadyClicked, count))
            }
        }
    }

    /// Rebuilds counters from click logs and returns what was repaired.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on
    /// database errors.
    pub async fn reconcile_counters(&self) -> Result<Vec<CounterDrift>, AppError> {
        let drifts = self.repository.reconcile_counters().await?;

        for drift in &drifts {
            warn!(
                page = %drift.page,
                tag = %drift.tag,
                recorded = drift.recorded,
                actual = drift.actual,
                "Counter drift repaired"
            );
        }
        info!("Reconciliation finished, {} counter(s) repaired", drifts.len());

        Ok(drifts)
    }

    /// Best-effort current aggregate. Read failures degrade to 0.
    async fn current_count(&self, page: &str, tag: &str) -> i64 {
        match self.repository.find_counter(page, tag).await {
            Ok(counter) => counter.map_or(0, |c| c.count),
            Err(e) => {
                warn!(%page, %tag, "Failed to read current count: {}", e);
                0
            }
        }
    }
}

fn record_outcome(outcome: &'static str) {
    metrics::counter!("clicks_total", "outcome" => outcome).increment(1);
}
