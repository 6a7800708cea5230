//! Read-only aggregate statistics service.

use std::sync::Arc;

use crate::domain::entities::ClickCounter;
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// Totals for one `(page, tag)` pair.
///
/// `counter` is `None` when nothing has been counted yet; the total is then
/// zero rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferStats {
    pub page: String,
    pub tag: String,
    pub counter: Option<ClickCounter>,
}

impl OfferStats {
    pub fn count(&self) -> i64 {
        self.counter.as_ref().map_or(0, |c| c.count)
    }
}

/// Service for reading aggregate counters.
///
/// Only counter rows are ever reported, so click logs can never inflate or
/// replace a total.
pub struct StatsService<R: ClickRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: ClickRepository + ?Sized> StatsService<R> {
    /// Creates a new statistics service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Retrieves the total for a single `(page, tag)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on
    /// database errors.
    pub async fn offer_stats(&self, page: &str, tag: &str) -> Result<OfferStats, AppError> {
        let counter = self.repository.find_counter(page, tag).await?;

        Ok(OfferStats {
            page: page.to_string(),
            tag: tag.to_string(),
            counter,
        })
    }

    /// Retrieves every counter for a page, highest count first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on
    /// database errors.
    pub async fn page_stats(&self, page: &str) -> Result<Vec<ClickCounter>, AppError> {
        self.repository.list_counters_for_page(page).await
    }

    /// Retrieves every counter, by page ascending then count descending.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on
    /// database errors.
    pub async fn all_stats(&self) -> Result<Vec<ClickCounter>, AppError> {
        self.repository.list_counters().await
    }

    /// Checks that the backing store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] when it is not.
    pub async fn check_storage(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockClickRepository;
    use chrono::Utc;

    fn counter(page: &str, tag: &str, count: i64) -> ClickCounter {
        ClickCounter {
            page: page.to_string(),
            tag: tag.to_string(),
            count,
            country: "United States".to_string(),
            last_click_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_offer_stats_found() {
        let mut mock_repo = MockClickRepository::new();

        let stored = counter("landing-a", "offer1", 2);
        mock_repo
            .expect_find_counter()
            .withf(|page, tag| page == "landing-a" && tag == "offer1")
            .times(1)
            .returning(move |_, _| Ok(Some(stored.clone())));

        let service = StatsService::new(Arc::new(mock_repo));
        let stats = service.offer_stats("landing-a", "offer1").await.unwrap();

        assert_eq!(stats.page, "landing-a");
        assert_eq!(stats.tag, "offer1");
        assert_eq!(stats.count(), 2);
    }

    #[tokio::test]
    async fn test_offer_stats_missing_is_zero() {
        let mut mock_repo = MockClickRepository::new();

        mock_repo
            .expect_find_counter()
            .times(1)
            .returning(|_, _| Ok(None));

        let service = StatsService::new(Arc::new(mock_repo));
        let stats = service.offer_stats("landing-a", "nothing").await.unwrap();

        assert_eq!(stats.count(), 0);
        assert!(stats.counter.is_none());
        assert_eq!(stats.tag, "nothing");
    }

    #[tokio::test]
    async fn test_page_stats() {
        let mut mock_repo = MockClickRepository::new();

        let rows = vec![counter("landing-a", "offer2", 9), counter("landing-a", "offer1", 3)];
        mock_repo
            .expect_list_counters_for_page()
            .withf(|page| page == "landing-a")
            .times(1)
            .returning(move |_| Ok(rows.clone()));

        let service = StatsService::new(Arc::new(mock_repo));
        let stats = service.page_stats("landing-a").await.unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].tag, "offer2");
    }

    #[tokio::test]
    async fn test_all_stats() {
        let mut mock_repo = MockClickRepository::new();

        let rows = vec![counter("a", "x", 1), counter("b", "y", 5)];
        mock_repo
            .expect_list_counters()
            .times(1)
            .returning(move || Ok(rows.clone()));

        let service = StatsService::new(Arc::new(mock_repo));
        let stats = service.all_stats().await.unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[1].page, "b");
    }
}
