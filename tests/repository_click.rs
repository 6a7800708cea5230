use offer_click_tracker::domain::entities::NewClickLog;
use offer_click_tracker::domain::repositories::{ClaimOutcome, ClickRepository};
use offer_click_tracker::infrastructure::persistence::PgClickRepository;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::task::JoinSet;

fn claim(page: &str, tag: &str, device_id: &str) -> NewClickLog {
    NewClickLog {
        page: page.to_string(),
        tag: tag.to_string(),
        device_id: device_id.to_string(),
        country: "United States".to_string(),
        source_address: Some("203.0.113.7".to_string()),
    }
}

fn repository(pool: PgPool) -> PgClickRepository {
    PgClickRepository::new(Arc::new(pool))
}

#[sqlx::test]
async fn test_claim_and_duplicate(pool: PgPool) {
    let repo = repository(pool.clone());

    let first = repo.claim_click(claim("landing-a", "offer1", "d1")).await.unwrap();
    match first {
        ClaimOutcome::Claimed { log, count } => {
            assert_eq!(count, 1);
            assert_eq!(log.device_id, "d1");
            assert_eq!(log.source_address.as_deref(), Some("203.0.113.7"));
        }
        other => panic!("expected claim, got {other:?}"),
    }

    let again = repo.claim_click(claim("landing-a", "offer1", "d1")).await.unwrap();
    assert_eq!(again, ClaimOutcome::Duplicate { count: 1 });

    let logs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM click_logs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(logs, 1);

    let counter = repo.find_counter("landing-a", "offer1").await.unwrap().unwrap();
    assert_eq!(counter.count, 1);
    assert_eq!(counter.country, "United States");
}

#[sqlx::test]
async fn test_missing_counter_is_none(pool: PgPool) {
    let repo = repository(pool);

    assert!(repo.find_counter("landing-a", "nothing").await.unwrap().is_none());
    assert_eq!(repo.count_click_logs("landing-a", "nothing").await.unwrap(), 0);
}

#[sqlx::test]
async fn test_concurrent_claims(pool: PgPool) {
    let repo = Arc::new(repository(pool));

    let mut tasks = JoinSet::new();
    for i in 0..20 {
        let same = repo.clone();
        tasks.spawn(async move { same.claim_click(claim("landing-a", "offer1", "same")).await });
        let repo = repo.clone();
        tasks.spawn(async move {
            repo.claim_click(claim("landing-a", "offer1", &format!("d{i}")))
                .await
        });
    }

    let mut claimed = 0;
    while let Some(result) = tasks.join_next().await {
        if let ClaimOutcome::Claimed { .. } = result.unwrap().unwrap() {
            claimed += 1;
        }
    }

    assert_eq!(claimed, 21);
    let counter = repo.find_counter("landing-a", "offer1").await.unwrap().unwrap();
    assert_eq!(counter.count, 21);
    assert_eq!(repo.count_click_logs("landing-a", "offer1").await.unwrap(), 21);
}

#[sqlx::test]
async fn test_list_ordering(pool: PgPool) {
    let repo = repository(pool);

    for (page, tag, devices) in [
        ("landing-b", "offer1", 1),
        ("landing-a", "offer1", 1),
        ("landing-a", "offer2", 3),
        ("landing-a", "offer3", 3),
    ] {
        for i in 0..devices {
            repo.claim_click(claim(page, tag, &format!("d{i}")))
                .await
                .unwrap();
        }
    }

    let page: Vec<String> = repo
        .list_counters_for_page("landing-a")
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.tag)
        .collect();
    assert_eq!(page, ["offer2", "offer3", "offer1"]);

    let all: Vec<(String, i64)> = repo
        .list_counters()
        .await
        .unwrap()
        .into_iter()
        .map(|c| (c.page, c.count))
        .collect();
    assert_eq!(
        all,
        [
            ("landing-a".to_string(), 3),
            ("landing-a".to_string(), 3),
            ("landing-a".to_string(), 1),
            ("landing-b".to_string(), 1),
        ]
    );
}

#[sqlx::test]
async fn test_reconcile_repairs_drift(pool: PgPool) {
    let repo = repository(pool.clone());

    for device in ["d1", "d2", "d3"] {
        repo.claim_click(claim("landing-a", "offer1", device))
            .await
            .unwrap();
    }
    repo.claim_click(claim("landing-a", "offer2", "d1"))
        .await
        .unwrap();

    sqlx::query("UPDATE click_counters SET count = 1 WHERE tag = 'offer1'")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM click_counters WHERE tag = 'offer2'")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO click_counters (page, tag, count, country) VALUES ('landing-a', 'ghost', 5, 'US')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let drifts = repo.reconcile_counters().await.unwrap();
    let mut summary: Vec<(String, i64, i64)> = drifts
        .into_iter()
        .map(|d| (d.tag, d.recorded, d.actual))
        .collect();
    summary.sort();
    assert_eq!(
        summary,
        [
            ("ghost".to_string(), 5, 0),
            ("offer1".to_string(), 1, 3),
            ("offer2".to_string(), 0, 1),
        ]
    );

    assert_eq!(
        repo.find_counter("landing-a", "offer1").await.unwrap().unwrap().count,
        3
    );
    assert_eq!(
        repo.find_counter("landing-a", "offer2").await.unwrap().unwrap().count,
        1
    );
    assert!(repo.reconcile_counters().await.unwrap().is_empty());
}

#[sqlx::test]
async fn test_ping(pool: PgPool) {
    let repo = repository(pool);
    assert!(repo.ping().await.is_ok());
}
