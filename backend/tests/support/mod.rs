//! Shared helpers for the backend integration suites.
//!
//! Integration tests compile as separate crates, so helpers they share live
//! here and each suite pulls them in with `mod support;`.

pub mod embedded_postgres;

pub use embedded_postgres::{TestDatabase, handle_cluster_setup_failure, provision_database};
