//! In-process implementation of the click repository.
//!
//! Claim and increment happen under one mutex, which gives the same
//! uniqueness and no-lost-update guarantees as the PostgreSQL repository
//! within a single process. State is not shared between processes, so this
//! backend is meant for tests and local experiments only.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::entities::{ClickCounter, ClickLog, CounterDrift, NewClickLog};
use crate::domain::repositories::{ClaimOutcome, ClickRepository};
use crate::error::AppError;

type LogKey = (String, String, String);
type OfferKey = (String, String);

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    logs: HashMap<LogKey, ClickLog>,
    counters: BTreeMap<OfferKey, ClickCounter>,
}

impl MemoryState {
    fn current(&self, page: &str, tag: &str) -> i64 {
        self.counters
            .get(&(page.to_string(), tag.to_string()))
            .map_or(0, |c| c.count)
    }
}

/// Click repository backed by process memory.
#[derive(Default)]
pub struct MemoryClickRepository {
    state: Mutex<MemoryState>,
    unavailable: AtomicBool,
}

impl MemoryClickRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every operation fail with [`AppError::Unavailable`] until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored click logs across all offers.
    pub fn click_log_count(&self) -> usize {
        self.lock().logs.len()
    }

    /// Overwrites a counter without touching the logs, leaving it out of
    /// step with the ledger.
    pub fn overwrite_counter(&self, page: &str, tag: &str, count: i64) {
        let mut state = self.lock();
        let counter = state
            .counters
            .entry((page.to_string(), tag.to_string()))
            .or_insert_with(|| ClickCounter {
                page: page.to_string(),
                tag: tag.to_string(),
                count: 0,
                country: String::new(),
                last_click_at: Utc::now(),
            });
        counter.count = count;
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::unavailable("Storage unavailable", json!({})));
        }
        Ok(())
    }
}

#[async_trait]
impl ClickRepository for MemoryClickRepository {
    async fn claim_click(&self, claim: NewClickLog) -> Result<ClaimOutcome, AppError> {
        self.check_available()?;

        let mut state = self.lock();
        let key = (
            claim.page.clone(),
            claim.tag.clone(),
            claim.device_id.clone(),
        );

        if state.logs.contains_key(&key) {
            let count = state.current(&claim.page, &claim.tag);
            return Ok(ClaimOutcome::Duplicate { count });
        }

        state.next_id += 1;
        let log = ClickLog {
            id: state.next_id,
            page: claim.page,
            tag: claim.tag,
            device_id: claim.device_id,
            country: claim.country,
            source_address: claim.source_address,
            created_at: Utc::now(),
        };
        state.logs.insert(key, log.clone());

        let counter = state
            .counters
            .entry((log.page.clone(), log.tag.clone()))
            .or_insert_with(|| ClickCounter {
                page: log.page.clone(),
                tag: log.tag.clone(),
                count: 0,
                country: log.country.clone(),
                last_click_at: log.created_at,
            });
        counter.count += 1;
        counter.country = log.country.clone();
        counter.last_click_at = log.created_at;
        let count = counter.count;

        Ok(ClaimOutcome::Claimed { log, count })
    }

    async fn find_counter(&self, page: &str, tag: &str) -> Result<Option<ClickCounter>, AppError> {
        self.check_available()?;

        Ok(self
            .lock()
            .counters
            .get(&(page.to_string(), tag.to_string()))
            .cloned())
    }

    async fn list_counters_for_page(&self, page: &str) -> Result<Vec<ClickCounter>, AppError> {
        self.check_available()?;

        let mut counters: Vec<ClickCounter> = self
            .lock()
            .counters
            .values()
            .filter(|c| c.page == page)
            .cloned()
            .collect();
        counters.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));

        Ok(counters)
    }

    async fn list_counters(&self) -> Result<Vec<ClickCounter>, AppError> {
        self.check_available()?;

        let mut counters: Vec<ClickCounter> = self.lock().counters.values().cloned().collect();
        counters.sort_by(|a, b| {
            a.page
                .cmp(&b.page)
                .then_with(|| b.count.cmp(&a.count))
                .then_with(|| a.tag.cmp(&b.tag))
        });

        Ok(counters)
    }

    async fn count_click_logs(&self, page: &str, tag: &str) -> Result<i64, AppError> {
        self.check_available()?;

        let count = self
            .lock()
            .logs
            .values()
            .filter(|log| log.page == page && log.tag == tag)
            .count();

        Ok(count as i64)
    }

    async fn reconcile_counters(&self) -> Result<Vec<CounterDrift>, AppError> {
        self.check_available()?;

        let mut state = self.lock();

        let mut tallies: BTreeMap<OfferKey, (i64, &ClickLog)> = BTreeMap::new();
        for log in state.logs.values() {
            let entry = tallies
                .entry((log.page.clone(), log.tag.clone()))
                .or_insert((0, log));
            entry.0 += 1;
            if log.created_at > entry.1.created_at {
                entry.1 = log;
            }
        }

        let mut repaired: BTreeMap<OfferKey, ClickCounter> = BTreeMap::new();
        let mut drifts = Vec::new();

        for (key, (actual, latest)) in &tallies {
            let recorded = state.counters.get(key).map_or(0, |c| c.count);
            if recorded != *actual {
                drifts.push(CounterDrift {
                    page: key.0.clone(),
                    tag: key.1.clone(),
                    recorded,
                    actual: *actual,
                });
                let mut counter = state.counters.get(key).cloned().unwrap_or(ClickCounter {
                    page: key.0.clone(),
                    tag: key.1.clone(),
                    count: 0,
                    country: latest.country.clone(),
                    last_click_at: latest.created_at,
                });
                counter.count = *actual;
                repaired.insert(key.clone(), counter);
            }
        }

        for (key, counter) in &state.counters {
            if counter.count != 0 && !tallies.contains_key(key) {
                drifts.push(CounterDrift {
                    page: key.0.clone(),
                    tag: key.1.clone(),
                    recorded: counter.count,
                    actual: 0,
                });
                repaired.insert(
                    key.clone(),
                    ClickCounter {
                        count: 0,
                        ..counter.clone()
                    },
                );
            }
        }

        drop(tallies);
        state.counters.extend(repaired);
        drifts.sort_by(|a, b| (&a.page, &a.tag).cmp(&(&b.page, &b.tag)));

        Ok(drifts)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_available()
    }
}
