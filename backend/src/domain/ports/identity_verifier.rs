//! Driven port for verifying identity tokens issued by the external provider.

use async_trait::async_trait;

use crate::domain::{BearerCredential, VerifiedIdentity};

use super::define_port_error;

define_port_error! {
    /// Reasons a credential did not verify.
    pub enum IdentityVerificationError {
        /// The token was malformed, expired, revoked, or signed by someone else.
        Rejected { message: String } => "identity token rejected: {message}",
        /// The token verified but carried no usable email claim.
        MissingEmail => "identity token has no email claim",
        /// The verifier itself could not run.
        Unavailable { message: String } => "identity verifier unavailable: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a bearer credential and return the identity it proves.
    async fn verify(
        &self,
        credential: &BearerCredential,
    ) -> Result<VerifiedIdentity, IdentityVerificationError>;
}
