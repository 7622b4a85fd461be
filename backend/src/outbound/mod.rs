//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories on Diesel
//! - **memory**: a single-lock store for tests and local runs
//! - **stripe**: the hosted checkout gateway
//! - **identity**: bearer ID-token verification
//!
//! Adapters translate between domain types and infrastructure shapes and
//! contain no business rules.

pub mod identity;
pub mod memory;
pub mod persistence;
pub mod stripe;
