//! Utility functions shared by the HTTP and persistence layers.

pub mod client_ip;
pub mod db_error;
