//! Driving port for parcel submission and lookup.
//!
//! These operations carry no idempotency logic; they validate input at the
//! edge and hand documents to the repository.

use async_trait::async_trait;

use crate::domain::{DeleteOutcome, EmailAddress, Error, InsertOutcome, Parcel, ParcelDraft, ParcelId};

/// Domain use-case port for parcels.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParcelService: Send + Sync {
    /// Store a new unpaid parcel stamped with the current time.
    async fn submit(&self, draft: ParcelDraft) -> Result<InsertOutcome, Error>;

    /// Fetch one parcel; a missing id is `Ok(None)`.
    async fn find(&self, id: &ParcelId) -> Result<Option<Parcel>, Error>;

    /// List parcels newest first, optionally for one sender.
    async fn list(&self, sender: Option<EmailAddress>) -> Result<Vec<Parcel>, Error>;

    /// Delete a parcel.
    async fn delete(&self, id: &ParcelId) -> Result<DeleteOutcome, Error>;
}
