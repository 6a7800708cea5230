//! Aggregate counter queries over the `click_counters` table.
//!
//! The count only moves through a single upsert statement, so concurrent
//! increments are serialized by the row lock and none are lost.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use crate::domain::entities::{ClickCounter, CounterDrift};

#[derive(Debug, sqlx::FromRow)]
struct ClickCounterRow {
    page: String,
    tag: String,
    count: i64,
    country: String,
    last_click_at: DateTime<Utc>,
}

impl From<ClickCounterRow> for ClickCounter {
    fn from(row: ClickCounterRow) -> Self {
        ClickCounter {
            page: row.page,
            tag: row.tag,
            count: row.count,
            country: row.country,
            last_click_at: row.last_click_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DriftRow {
    page: String,
    tag: String,
    recorded: i64,
    actual: i64,
}

/// Creates the counter at 1 or adds 1, and returns the new count.
///
/// `country` and `last_click_at` are overwritten with this click's values.
pub async fn increment(
    conn: &mut PgConnection,
    page: &str,
    tag: &str,
    country: &str,
    at: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO click_counters (page, tag, count, country, last_click_at)
        VALUES ($1, $2, 1, $3, $4)
        ON CONFLICT (page, tag) DO UPDATE
        SET count = click_counters.count + 1,
            country = EXCLUDED.country,
            last_click_at = EXCLUDED.last_click_at
        RETURNING count
        "#,
    )
    .bind(page)
    .bind(tag)
    .bind(country)
    .bind(at)
    .fetch_one(&mut *conn)
    .await
}

/// Current count, 0 if the pair has never been counted.
pub async fn current(conn: &mut PgConnection, page: &str, tag: &str) -> Result<i64, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT count FROM click_counters WHERE page = $1 AND tag = $2",
    )
    .bind(page)
    .bind(tag)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(count.unwrap_or(0))
}

pub async fn find(
    conn: &mut PgConnection,
    page: &str,
    tag: &str,
) -> Result<Option<ClickCounter>, sqlx::Error> {
    let row = sqlx::query_as::<_, ClickCounterRow>(
        r#"
        SELECT page, tag, count, country, last_click_at
        FROM click_counters
        WHERE page = $1 AND tag = $2
        "#,
    )
    .bind(page)
    .bind(tag)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(ClickCounter::from))
}

pub async fn list_for_page(
    conn: &mut PgConnection,
    page: &str,
) -> Result<Vec<ClickCounter>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ClickCounterRow>(
        r#"
        SELECT page, tag, count, country, last_click_at
        FROM click_counters
        WHERE page = $1
        ORDER BY count DESC, tag ASC
        "#,
    )
    .bind(page)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(ClickCounter::from).collect())
}

pub async fn list_all(conn: &mut PgConnection) -> Result<Vec<ClickCounter>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ClickCounterRow>(
        r#"
        SELECT page, tag, count, country, last_click_at
        FROM click_counters
        ORDER BY page ASC, count DESC, tag ASC
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(ClickCounter::from).collect())
}

/// Rewrites counters from the click log tally.
///
/// The caller must hold [`super::click_ledger::lock_claims`] in the same
/// transaction. Counters without any log row drop to 0; pairs with logs but
/// no counter get one, carrying the latest log's country and timestamp.
pub async fn rebuild_from_logs(conn: &mut PgConnection) -> Result<Vec<CounterDrift>, sqlx::Error> {
    let drifts = sqlx::query_as::<_, DriftRow>(
        r#"
        SELECT
            COALESCE(l.page, c.page) AS page,
            COALESCE(l.tag, c.tag) AS tag,
            COALESCE(c.count, 0)::BIGINT AS recorded,
            COALESCE(l.actual, 0)::BIGINT AS actual
        FROM (
            SELECT page, tag, COUNT(*) AS actual
            FROM click_logs
            GROUP BY page, tag
        ) l
        FULL OUTER JOIN click_counters c ON c.page = l.page AND c.tag = l.tag
        WHERE COALESCE(c.count, 0) <> COALESCE(l.actual, 0)
        ORDER BY 1, 2
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    if drifts.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query(
        r#"
        INSERT INTO click_counters (page, tag, count, country, last_click_at)
        SELECT DISTINCT ON (page, tag)
            page,
            tag,
            COUNT(*) OVER (PARTITION BY page, tag),
            country,
            created_at
        FROM click_logs
        ORDER BY page, tag, created_at DESC
        ON CONFLICT (page, tag) DO UPDATE
        SET count = EXCLUDED.count
        WHERE click_counters.count <> EXCLUDED.count
        "#,
    )
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r#"
        UPDATE click_counters c
        SET count = 0
        WHERE c.count <> 0
          AND NOT EXISTS (
              SELECT 1 FROM click_logs l WHERE l.page = c.page AND l.tag = c.tag
          )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    Ok(drifts
        .into_iter()
        .map(|d| CounterDrift {
            page: d.page,
            tag: d.tag,
            recorded: d.recorded,
            actual: d.actual,
        })
        .collect())
}
