//! Domain layer containing business entities and rules.
//!
//! - [`entities`] - click logs and aggregate counters
//! - [`repositories`] - storage contract for both
//! - [`geo_policy`] - country allow-list
//! - [`outcome`] - accepted / rejected submission results
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler receives a submission
//! 2. [`crate::application::services::TrackingService`] validates it and
//!    applies the [`geo_policy::GeoPolicy`]
//! 3. [`repositories::ClickRepository::claim_click`] claims the ledger row
//!    and increments the counter in one transaction
//! 4. The [`outcome::TrackOutcome`] is returned to the client

pub mod entities;
pub mod geo_policy;
pub mod outcome;
pub mod repositories;
