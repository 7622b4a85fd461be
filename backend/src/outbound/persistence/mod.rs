//! PostgreSQL adapters for the repository ports.
//!
//! Adapters stay thin: they translate between Diesel rows (`models.rs`,
//! `schema.rs`, both private) and domain types, and map driver failures to
//! the port error enums. Multi-row writes (settlement, rider approval) run in
//! a single database transaction.
//!
//! ```ignore
//! use swift_parcel::outbound::persistence::{DbPool, DieselParcelRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new(database_url)).await?;
//! let parcels = DieselParcelRepository::new(pool.clone());
//! ```

mod diesel_error_mapping;
mod diesel_parcel_repository;
mod diesel_payment_repository;
mod diesel_rider_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_parcel_repository::DieselParcelRepository;
pub use diesel_payment_repository::DieselPaymentRepository;
pub use diesel_rider_repository::DieselRiderRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
