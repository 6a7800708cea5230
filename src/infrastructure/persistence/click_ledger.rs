//! Dedup ledger: claims over the `click_logs` table.
//!
//! Uniqueness of `(page, tag, device_id)` is enforced by the table's unique
//! constraint. A claim is a single conditional insert; there is no separate
//! existence check that two concurrent requests could both pass.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use crate::domain::entities::{ClickLog, NewClickLog};

#[derive(Debug, sqlx::FromRow)]
struct ClickLogRow {
    id: i64,
    page: String,
    tag: String,
    device_id: String,
    country: String,
    source_address: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ClickLogRow> for ClickLog {
    fn from(row: ClickLogRow) -> Self {
        ClickLog {
            id: row.id,
            page: row.page,
            tag: row.tag,
            device_id: row.device_id,
            country: row.country,
            source_address: row.source_address,
            created_at: row.created_at,
        }
    }
}

/// Result of a single ledger insert.
#[derive(Debug)]
pub enum Claim {
    Claimed(ClickLog),
    /// A row for the same triple already exists (or was committed by a
    /// concurrent claim while this one waited on the constraint).
    Rejected,
}

/// Attempts to create the click log row.
///
/// Run inside the transaction that also increments the counter.
pub async fn claim(conn: &mut PgConnection, new_click: &NewClickLog) -> Result<Claim, sqlx::Error> {
    let row = sqlx::query_as::<_, ClickLogRow>(
        r#"
        INSERT INTO click_logs (page, tag, device_id, country, source_address)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT ON CONSTRAINT click_logs_page_tag_device_key DO NOTHING
        RETURNING id, page, tag, device_id, country, source_address, created_at
        "#,
    )
    .bind(&new_click.page)
    .bind(&new_click.tag)
    .bind(&new_click.device_id)
    .bind(&new_click.country)
    .bind(&new_click.source_address)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(match row {
        Some(row) => Claim::Claimed(row.into()),
        None => Claim::Rejected,
    })
}

/// Counts click logs for a `(page, tag)` pair.
pub async fn count_for_offer(
    conn: &mut PgConnection,
    page: &str,
    tag: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM click_logs
        WHERE page = $1 AND tag = $2
        "#,
    )
    .bind(page)
    .bind(tag)
    .fetch_one(&mut *conn)
    .await
}

/// Blocks new claims until the surrounding transaction ends.
///
/// Waits for claims already in flight to commit, so counters read under
/// this lock match the ledger exactly.
pub async fn lock_claims(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    sqlx::query("LOCK TABLE click_logs IN SHARE MODE")
        .execute(&mut *conn)
        .await?;

    Ok(())
}
