//! Handler for aggregate click statistics.

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::json;

use crate::api::dto::stats::{OfferStatsResponse, StatsQuery, StatsResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns click totals.
///
/// # Endpoint
///
/// `GET /api/stats?page={page}&tag={tag}`
///
/// # Query Parameters
///
/// - `page` + `tag` - one total, `count: 0` if never clicked
/// - `page` only - every offer on the page, highest count first
/// - neither - every offer, by page then highest count
///
/// # Response Codes
///
/// - **200 OK**: Totals returned
/// - **400 Bad Request**: `tag` given without `page`
/// - **503 Service Unavailable**: Storage unreachable
///
/// # Response
///
/// ```json
/// { "page": "landing-a", "tag": "offer1", "count": 2, "country": "US", "lastClickAt": "..." }
/// ```
pub async fn stats_handler(
    State(state): State<AppState>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, AppError> {
    let page = non_empty(params.page.as_deref());
    let tag = non_empty(params.tag.as_deref());

    let response = match (page, tag) {
        (Some(page), Some(tag)) => {
            let stats = state.stats_service.offer_stats(page, tag).await?;
            StatsResponse::Offer(stats.into())
        }
        (Some(page), None) => {
            let counters = state.stats_service.page_stats(page).await?;
            StatsResponse::List(counters.into_iter().map(OfferStatsResponse::from).collect())
        }
        (None, None) => {
            let counters = state.stats_service.all_stats().await?;
            StatsResponse::List(counters.into_iter().map(OfferStatsResponse::from).collect())
        }
        (None, Some(tag)) => {
            return Err(AppError::bad_request(
                "Query parameter 'tag' requires 'page'",
                json!({ "tag": tag }),
            ));
        }
    };

    Ok(Json(response))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
