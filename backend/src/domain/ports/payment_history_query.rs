//! Driving port for reading payment history.

use async_trait::async_trait;

use crate::domain::{Error, Payment, VerifiedIdentity};

/// Domain use-case port for a customer's own payments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentHistoryQuery: Send + Sync {
    /// List payments for `requested` (defaulting to the caller), most recent first.
    ///
    /// `requested` is the email text as the client sent it; anything other
    /// than the caller's exact email is `Forbidden`.
    async fn history(
        &self,
        identity: &VerifiedIdentity,
        requested: Option<String>,
    ) -> Result<Vec<Payment>, Error>;
}
