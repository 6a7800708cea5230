//! PostgreSQL implementation of the click repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::aggregate_counter;
use super::click_ledger::{self, Claim};
use crate::domain::entities::{ClickCounter, CounterDrift, NewClickLog};
use crate::domain::repositories::{ClaimOutcome, ClickRepository};
use crate::error::AppError;
use crate::utils::db_error::is_duplicate_claim;

/// PostgreSQL repository for click logs and counters.
///
/// A claim and its increment share one transaction: if the increment fails
/// the ledger row is rolled back with it.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn claim_in_transaction(&self, claim: &NewClickLog) -> Result<ClaimOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let outcome = match click_ledger::claim(&mut tx, claim).await? {
            Claim::Claimed(log) => {
                let count = aggregate_counter::increment(
                    &mut tx,
                    &claim.page,
                    &claim.tag,
                    &claim.country,
                    log.created_at,
                )
                .await?;
                ClaimOutcome::Claimed { log, count }
            }
            Claim::Rejected => {
                let count = aggregate_counter::current(&mut tx, &claim.page, &claim.tag).await?;
                ClaimOutcome::Duplicate { count }
            }
        };

        tx.commit().await?;

        Ok(outcome)
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn claim_click(&self, claim: NewClickLog) -> Result<ClaimOutcome, AppError> {
        match self.claim_in_transaction(&claim).await {
            Ok(outcome) => Ok(outcome),
            // The conditional insert absorbs conflicts; a raw violation can
            // still surface if the constraint is hit another way.
            Err(e) if is_duplicate_claim(&e) => {
                let mut conn = self.pool.acquire().await?;
                let count = aggregate_counter::current(&mut conn, &claim.page, &claim.tag).await?;
                Ok(ClaimOutcome::Duplicate { count })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_counter(&self, page: &str, tag: &str) -> Result<Option<ClickCounter>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(aggregate_counter::find(&mut conn, page, tag).await?)
    }

    async fn list_counters_for_page(&self, page: &str) -> Result<Vec<ClickCounter>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(aggregate_counter::list_for_page(&mut conn, page).await?)
    }

    async fn list_counters(&self) -> Result<Vec<ClickCounter>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(aggregate_counter::list_all(&mut conn).await?)
    }

    async fn count_click_logs(&self, page: &str, tag: &str) -> Result<i64, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(click_ledger::count_for_offer(&mut conn, page, tag).await?)
    }

    async fn reconcile_counters(&self) -> Result<Vec<CounterDrift>, AppError> {
        let mut tx = self.pool.begin().await?;

        click_ledger::lock_claims(&mut tx).await?;
        let drifts = aggregate_counter::rebuild_from_logs(&mut tx).await?;

        tx.commit().await?;

        Ok(drifts)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
