//! Rider applications and role escalation.
//!
//! Approving an application promotes the applicant's account to the rider
//! role. The status write and the promotion are applied as one unit by the
//! repository, so an application is never left approved with its user
//! unpromoted. Re-approving an approved application re-runs the promotion,
//! which is an idempotent role overwrite.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    RiderApplications, RiderRepository, RiderRepositoryError, RiderStatusChange,
    RiderStatusOutcome, RiderStatusUpdate,
};
use crate::domain::{Error, InsertOutcome, Rider, RiderDraft, RiderId, RiderStatus};

fn map_repository_error(error: RiderRepositoryError) -> Error {
    match error {
        RiderRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("rider repository unavailable: {message}"))
        }
        RiderRepositoryError::Query { message } => {
            Error::internal(format!("rider repository error: {message}"))
        }
        RiderRepositoryError::InvalidTransition { from, to } => {
            Error::conflict(format!("application is already {from} and cannot become {to}"))
        }
    }
}

/// Rider application service implementing [`RiderApplications`].
#[derive(Clone)]
pub struct RiderReviewService<R> {
    riders: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> RiderReviewService<R> {
    pub fn new(riders: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { riders, clock }
    }
}

#[async_trait]
impl<R> RiderApplications for RiderReviewService<R>
where
    R: RiderRepository,
{
    async fn apply(&self, draft: RiderDraft) -> Result<InsertOutcome, Error> {
        let rider = Rider::apply(RiderId::random(), draft, self.clock.utc());
        self.riders
            .insert(&rider)
            .await
            .map_err(map_repository_error)
    }

    async fn list(&self, status: Option<RiderStatus>) -> Result<Vec<Rider>, Error> {
        self.riders.list(status).await.map_err(map_repository_error)
    }

    async fn set_status(&self, update: RiderStatusUpdate) -> Result<RiderStatusOutcome, Error> {
        let RiderStatusUpdate {
            rider_id,
            status,
            email,
        } = update;
        let promote = if status.promotes_applicant() {
            Some(email.ok_or_else(|| {
                Error::invalid_request("email is required to approve a rider")
            })?)
        } else {
            None
        };
        let promoted_email = promote.clone();
        let write = self
            .riders
            .apply_status(&RiderStatusChange {
                rider_id,
                status,
                promote,
            })
            .await
            .map_err(map_repository_error)?;

        if let (Some(email), Some(promotion)) = (promoted_email, write.promotion) {
            info!(
                rider = %rider_id,
                user = %email,
                matched = promotion.matched_count,
                modified = promotion.modified_count,
                "rider approved and user promoted"
            );
        }

        Ok(RiderStatusOutcome {
            rider_update: write.rider_update,
            user_promotion: write.promotion,
        })
    }
}
