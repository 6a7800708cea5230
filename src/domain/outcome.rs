//! Terminal outcomes of a click submission.

use serde::Serialize;

/// Why a submission was not counted.
///
/// These are business outcomes, not errors: each is reported to the client
/// with `success: false` and the best-effort current count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    MissingFields,
    CountryNotAllowed,
    AlreadyClicked,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::MissingFields => "missing_fields",
            RejectReason::CountryNotAllowed => "country_not_allowed",
            RejectReason::AlreadyClicked => "already_clicked",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running a submission through validation, geo policy, claim and
/// increment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    /// The click was new; `count` is the aggregate right after this
    /// submission's increment.
    Accepted { count: i64 },
    Rejected { reason: RejectReason, count: i64 },
}

impl TrackOutcome {
    pub fn rejected(reason: RejectReason, count: i64) -> Self {
        Self::Rejected { reason, count }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, TrackOutcome::Accepted { .. })
    }

    pub fn count(&self) -> i64 {
        match self {
            TrackOutcome::Accepted { count } | TrackOutcome::Rejected { count, .. } => *count,
        }
    }

    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            TrackOutcome::Accepted { .. } => None,
            TrackOutcome::Rejected { reason, .. } => Some(*reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_wire_names() {
        assert_eq!(
            serde_json::to_value(RejectReason::MissingFields).unwrap(),
            "missing_fields"
        );
        assert_eq!(
            serde_json::to_value(RejectReason::CountryNotAllowed).unwrap(),
            "country_not_allowed"
        );
        assert_eq!(
            serde_json::to_value(RejectReason::AlreadyClicked).unwrap(),
            "already_clicked"
        );
        assert_eq!(RejectReason::AlreadyClicked.to_string(), "already_clicked");
    }

    #[test]
    fn test_outcome_accessors() {
        let accepted = TrackOutcome::Accepted { count: 3 };
        assert!(accepted.is_accepted());
        assert_eq!(accepted.count(), 3);
        assert_eq!(accepted.reason(), None);

        let rejected = TrackOutcome::rejected(RejectReason::AlreadyClicked, 3);
        assert!(!rejected.is_accepted());
        assert_eq!(rejected.count(), 3);
        assert_eq!(rejected.reason(), Some(RejectReason::AlreadyClicked));
    }
}
