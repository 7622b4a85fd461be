//! Port abstraction for rider application persistence.
//!
//! Status changes may carry a role promotion for the applicant's user
//! account. Adapters apply the status write and the promotion in one unit:
//! if the promotion fails the status change is rolled back. No promotion is
//! attempted when the rider id matches nothing, and a change the current
//! status does not allow writes nothing.

use async_trait::async_trait;

use crate::domain::{EmailAddress, InsertOutcome, Rider, RiderId, RiderStatus, UpdateOutcome};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by rider repository adapters.
    pub enum RiderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "rider repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "rider repository query failed: {message}",
        /// The application has already been decided the other way.
        InvalidTransition { from: String, to: String } =>
            "rider cannot move from {from} to {to}",
    }
}

/// A status change, optionally promoting a user to the rider role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiderStatusChange {
    pub rider_id: RiderId,
    pub status: RiderStatus,
    /// User to promote alongside the status write.
    pub promote: Option<EmailAddress>,
}

/// Outcomes of both halves of a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiderStatusWrite {
    pub rider_update: UpdateOutcome,
    /// Present when a promotion was requested and the rider exists.
    pub promotion: Option<UpdateOutcome>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RiderRepository: Send + Sync {
    /// Store a new application.
    async fn insert(&self, rider: &Rider) -> Result<InsertOutcome, RiderRepositoryError>;

    /// List applications, newest first, optionally filtered by status.
    async fn list(&self, status: Option<RiderStatus>) -> Result<Vec<Rider>, RiderRepositoryError>;

    /// Apply a status change and any promotion atomically.
    async fn apply_status(
        &self,
        change: &RiderStatusChange,
    ) -> Result<RiderStatusWrite, RiderRepositoryError>;
}
