//! DTOs for click submission.

use serde::{Deserialize, Serialize};

use crate::application::services::ClickSubmission;
use crate::domain::outcome::{RejectReason, TrackOutcome};

/// Click submitted by a landing page.
///
/// All fields are optional at the parsing level; presence and format are
/// checked by the tracking service.
///
/// ```json
/// { "page": "landing-a", "tag": "offer1", "country": "United States", "deviceId": "d1" }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequest {
    pub page: Option<String>,
    pub tag: Option<String>,
    pub country: Option<String>,
    #[serde(alias = "device_id")]
    pub device_id: Option<String>,
}

impl TrackRequest {
    /// Attaches the transport supplied source address.
    pub fn into_submission(self, source_address: Option<String>) -> ClickSubmission {
        ClickSubmission {
            page: self.page,
            tag: self.tag,
            device_id: self.device_id,
            country: self.country,
            source_address,
        }
    }
}

/// Result of a click submission.
///
/// - accepted: `{"success": true, "count": 2}`
/// - rejected: `{"success": false, "message": "already_clicked", "count": 2}`
#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<RejectReason>,
    pub count: i64,
}

impl From<TrackOutcome> for TrackResponse {
    fn from(outcome: TrackOutcome) -> Self {
        match outcome {
            TrackOutcome::Accepted { count } => Self {
                success: true,
                message: None,
                count,
            },
            TrackOutcome::Rejected { reason, count } => Self {
                success: false,
                message: Some(reason),
                count,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_accepts_both_device_spellings() {
        let camel: TrackRequest = serde_json::from_value(json!({
            "page": "landing-a", "tag": "offer1", "country": "US", "deviceId": "d1"
        }))
        .unwrap();
        assert_eq!(camel.device_id.as_deref(), Some("d1"));

        let snake: TrackRequest =
            serde_json::from_value(json!({ "device_id": "d2" })).unwrap();
        assert_eq!(snake.device_id.as_deref(), Some("d2"));
        assert!(snake.page.is_none());
    }

    #[test]
    fn test_response_shapes() {
        let accepted = serde_json::to_value(TrackResponse::from(TrackOutcome::Accepted {
            count: 1,
        }))
        .unwrap();
        assert_eq!(accepted, json!({ "success": true, "count": 1 }));

        let rejected = serde_json::to_value(TrackResponse::from(TrackOutcome::rejected(
            RejectReason::CountryNotAllowed,
            0,
        )))
        .unwrap();
        assert_eq!(
            rejected,
            json!({ "success": false, "message": "country_not_allowed", "count": 0 })
        );
    }
}
