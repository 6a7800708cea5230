//! Core domain entities.
//!
//! - [`ClickLog`] - one accepted claim per `(page, tag, device)`
//! - [`ClickCounter`] - running total per `(page, tag)`
//!
//! The two live in separate tables, so totals never have to filter log rows
//! out of a shared collection.

pub mod click_counter;
pub mod click_log;

pub use click_counter::{ClickCounter, CounterDrift};
pub use click_log::{ClickLog, NewClickLog};
