//! Handler for click submission.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::api::dto::track::{TrackRequest, TrackResponse};
use crate::api::extract::ClientAddress;
use crate::domain::outcome::RejectReason;
use crate::error::AppError;
use crate::state::AppState;

/// Records a click for a `(page, tag)` offer.
///
/// # Endpoint
///
/// `POST /api/track`
///
/// # Request Body
///
/// ```json
/// { "page": "landing-a", "tag": "offer1", "country": "US", "deviceId": "d1" }
/// ```
///
/// # Response Codes
///
/// - **200 OK**: Click accepted, or rejected as `country_not_allowed` /
///   `already_clicked`
/// - **400 Bad Request**: `missing_fields`, including unparseable bodies
/// - **503 Service Unavailable**: Storage unreachable, safe to retry
///
/// A body that is not valid JSON is treated the same as one with every field
/// missing.
pub async fn track_handler(
    State(state): State<AppState>,
    ClientAddress(source_address): ClientAddress,
    payload: Result<Json<TrackRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TrackResponse>), AppError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Unreadable track body: {}", rejection.body_text());
            TrackRequest::default()
        }
    };

    let outcome = state
        .tracking_service
        .submit(request.into_submission(source_address))
        .await?;

    let status = match outcome.reason() {
        Some(RejectReason::MissingFields) => StatusCode::BAD_REQUEST,
        _ => StatusCode::OK,
    };

    Ok((status, Json(TrackResponse::from(outcome))))
}
