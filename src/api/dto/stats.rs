//! DTOs for aggregate statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::services::stats_service::OfferStats;
use crate::domain::entities::ClickCounter;

/// Query parameters for `GET /api/stats`.
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub page: Option<String>,
    pub tag: Option<String>,
}

/// Total for one `(page, tag)` pair.
///
/// `country` and `lastClickAt` are omitted when nothing was counted yet.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferStatsResponse {
    pub page: String,
    pub tag: String,
    pub count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_click_at: Option<DateTime<Utc>>,
}

impl From<ClickCounter> for OfferStatsResponse {
    fn from(counter: ClickCounter) -> Self {
        Self {
            page: counter.page,
            tag: counter.tag,
            count: counter.count,
            country: Some(counter.country),
            last_click_at: Some(counter.last_click_at),
        }
    }
}

impl From<OfferStats> for OfferStatsResponse {
    fn from(stats: OfferStats) -> Self {
        match stats.counter {
            Some(counter) => counter.into(),
            None => Self {
                page: stats.page,
                tag: stats.tag,
                count: 0,
                country: None,
                last_click_at: None,
            },
        }
    }
}

/// A single total when both `page` and `tag` are given, a list otherwise.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StatsResponse {
    Offer(OfferStatsResponse),
    List(Vec<OfferStatsResponse>),
}
