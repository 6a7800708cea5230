//! Click repository implementations.
//!
//! - [`PgClickRepository`] - PostgreSQL, built from the [`click_ledger`] and
//!   [`aggregate_counter`] query modules
//! - [`MemoryClickRepository`] - single-process store for tests

pub mod aggregate_counter;
pub mod click_ledger;
pub mod memory_click_repository;
pub mod pg_click_repository;

pub use memory_click_repository::MemoryClickRepository;
pub use pg_click_repository::PgClickRepository;
