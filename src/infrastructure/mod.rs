//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`database`] - PostgreSQL pool bootstrap and migrations
//! - [`persistence`] - repository implementations

pub mod database;
pub mod persistence;
