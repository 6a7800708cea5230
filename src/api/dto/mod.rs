//! Data Transfer Objects for API requests and responses.
//!
//! JSON field names are camelCase to match the landing page client.

pub mod health;
pub mod stats;
pub mod track;
