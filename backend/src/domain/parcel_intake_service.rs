//! Parcel submission and lookup services.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{ParcelRepository, ParcelRepositoryError, ParcelService};
use crate::domain::{
    DeleteOutcome, EmailAddress, Error, InsertOutcome, Parcel, ParcelDraft, ParcelId,
};

fn map_repository_error(error: ParcelRepositoryError) -> Error {
    match error {
        ParcelRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("parcel repository unavailable: {message}"))
        }
        ParcelRepositoryError::Query { message } => {
            Error::internal(format!("parcel repository error: {message}"))
        }
    }
}

/// Parcel service implementing [`ParcelService`].
#[derive(Clone)]
pub struct ParcelIntakeService<R> {
    parcels: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ParcelIntakeService<R> {
    pub fn new(parcels: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { parcels, clock }
    }
}

#[async_trait]
impl<R> ParcelService for ParcelIntakeService<R>
where
    R: ParcelRepository,
{
    async fn submit(&self, draft: ParcelDraft) -> Result<InsertOutcome, Error> {
        let parcel = Parcel::submit(ParcelId::random(), draft, self.clock.utc());
        self.parcels
            .insert(&parcel)
            .await
            .map_err(map_repository_error)
    }

    async fn find(&self, id: &ParcelId) -> Result<Option<Parcel>, Error> {
        self.parcels
            .find_by_id(id)
            .await
            .map_err(map_repository_error)
    }

    async fn list(&self, sender: Option<EmailAddress>) -> Result<Vec<Parcel>, Error> {
        self.parcels.list(sender).await.map_err(map_repository_error)
    }

    async fn delete(&self, id: &ParcelId) -> Result<DeleteOutcome, Error> {
        self.parcels.delete(id).await.map_err(map_repository_error)
    }
}
