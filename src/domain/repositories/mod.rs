//! Repository trait definitions for the domain layer.
//!
//! Traits define the storage contract; implementations live in
//! `crate::infrastructure::persistence`. Mocks are generated with `mockall`
//! for service tests.

pub mod click_repository;

pub use click_repository::{ClaimOutcome, ClickRepository};

#[cfg(test)]
pub use click_repository::MockClickRepository;
