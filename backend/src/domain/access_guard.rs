//! Bearer credential checks for endpoints that need an identity.
//!
//! The guard is invoked explicitly by each endpoint that needs it rather than
//! sitting in the request pipeline. Ownership is a straight equality check on
//! the verified email: any authenticated identity may act on its own records
//! only.

use std::sync::Arc;

use tracing::debug;

use super::ports::{IdentityVerificationError, IdentityVerifier};
use super::{BearerCredential, Error, VerifiedIdentity};

/// Message returned for missing or unverifiable credentials.
pub const UNAUTHORIZED_MESSAGE: &str = "unauthorized access";
/// Message returned when an identity reaches for someone else's records.
pub const FORBIDDEN_MESSAGE: &str = "forbidden access";

/// Verifies bearer credentials and checks record ownership.
#[derive(Clone)]
pub struct AccessGuard {
    verifier: Arc<dyn IdentityVerifier>,
}

impl AccessGuard {
    pub fn new(verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { verifier }
    }

    /// Resolve a raw `Authorization` header into a verified identity.
    ///
    /// A missing header, a non-bearer scheme, and any verification failure
    /// all yield `Unauthorized`; the reason is logged, never returned.
    pub async fn authorize(&self, header: Option<&str>) -> Result<VerifiedIdentity, Error> {
        let Some(raw) = header else {
            return Err(Error::unauthorized(UNAUTHORIZED_MESSAGE));
        };
        let credential = BearerCredential::from_header(raw).map_err(|err| {
            debug!(reason = %err, "rejected authorization header");
            Error::unauthorized(UNAUTHORIZED_MESSAGE)
        })?;
        self.verifier
            .verify(&credential)
            .await
            .map_err(|err| match err {
                IdentityVerificationError::Unavailable { message } => {
                    Error::service_unavailable(format!("identity verifier unavailable: {message}"))
                }
                other => {
                    debug!(reason = %other, "identity token did not verify");
                    Error::unauthorized(UNAUTHORIZED_MESSAGE)
                }
            })
    }

    /// Allow access only when `requested` is exactly the identity's email.
    ///
    /// The comparison is on the raw text: padding, case differences, and
    /// strings that are not addresses at all are refused.
    pub fn authorize_ownership(identity: &VerifiedIdentity, requested: &str) -> Result<(), Error> {
        if identity.email().as_ref() == requested {
            Ok(())
        } else {
            Err(Error::forbidden(FORBIDDEN_MESSAGE))
        }
    }
}

impl std::fmt::Debug for AccessGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGuard").finish_non_exhaustive()
    }
}
