//! Port abstraction for parcel persistence.
use async_trait::async_trait;

use crate::domain::{DeleteOutcome, EmailAddress, InsertOutcome, Parcel, ParcelId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by parcel repository adapters.
    pub enum ParcelRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "parcel repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "parcel repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParcelRepository: Send + Sync {
    /// Store a newly submitted parcel.
    async fn insert(&self, parcel: &Parcel) -> Result<InsertOutcome, ParcelRepositoryError>;

    /// Fetch a parcel by identifier.
    async fn find_by_id(&self, id: &ParcelId) -> Result<Option<Parcel>, ParcelRepositoryError>;

    /// List parcels, newest first, optionally restricted to one sender.
    async fn list(
        &self,
        sender: Option<EmailAddress>,
    ) -> Result<Vec<Parcel>, ParcelRepositoryError>;

    /// Remove a parcel; deleting a missing id reports zero deletions.
    async fn delete(&self, id: &ParcelId) -> Result<DeleteOutcome, ParcelRepositoryError>;
}
