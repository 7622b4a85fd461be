//! Payment history for authenticated customers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{PaymentHistoryQuery, PaymentRepository, PaymentRepositoryError};
use crate::domain::{AccessGuard, Error, Payment, VerifiedIdentity};

fn map_repository_error(error: PaymentRepositoryError) -> Error {
    match error {
        PaymentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("payment repository unavailable: {message}"))
        }
        other => Error::internal(format!("payment repository error: {other}")),
    }
}

/// History service implementing [`PaymentHistoryQuery`].
///
/// Without an explicit email the caller's own history is returned.
#[derive(Clone)]
pub struct PaymentHistoryService<P> {
    payments: Arc<P>,
}

impl<P> PaymentHistoryService<P> {
    pub fn new(payments: Arc<P>) -> Self {
        Self { payments }
    }
}

#[async_trait]
impl<P> PaymentHistoryQuery for PaymentHistoryService<P>
where
    P: PaymentRepository,
{
    async fn history(
        &self,
        identity: &VerifiedIdentity,
        requested: Option<String>,
    ) -> Result<Vec<Payment>, Error> {
        if let Some(raw) = requested {
            AccessGuard::authorize_ownership(identity, &raw)?;
        }
        self.payments
            .list(Some(identity.email().clone()))
            .await
            .map_err(map_repository_error)
    }
}
