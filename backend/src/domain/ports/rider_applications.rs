//! Driving port for rider applications and their review.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{
    EmailAddress, Error, InsertOutcome, Rider, RiderDraft, RiderId, RiderStatus, UpdateOutcome,
};

/// A reviewer's decision on an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiderStatusUpdate {
    pub rider_id: RiderId,
    pub status: RiderStatus,
    /// Account to promote on approval, as supplied by the reviewer.
    pub email: Option<EmailAddress>,
}

/// Outcome of a review: the application write and, on approval, the promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiderStatusOutcome {
    #[serde(flatten)]
    pub rider_update: UpdateOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_promotion: Option<UpdateOutcome>,
}

/// Domain use-case port for rider applications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RiderApplications: Send + Sync {
    /// Store a pending application.
    async fn apply(&self, draft: RiderDraft) -> Result<InsertOutcome, Error>;

    /// List applications, optionally filtered by status.
    async fn list(&self, status: Option<RiderStatus>) -> Result<Vec<Rider>, Error>;

    /// Record a review decision, promoting the applicant on approval.
    async fn set_status(&self, update: RiderStatusUpdate) -> Result<RiderStatusOutcome, Error>;
}
