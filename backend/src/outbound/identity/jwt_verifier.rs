//! ID-token verification backed by `jsonwebtoken`.
//!
//! Tokens are Firebase-style ID tokens: the issuer is
//! `https://securetoken.google.com/<project>`, the audience is the project id,
//! and the verified address travels in the `email` claim.

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use tracing::debug;

use crate::domain::ports::{IdentityVerificationError, IdentityVerifier};
use crate::domain::{BearerCredential, EmailAddress, VerifiedIdentity};

const ISSUER_PREFIX: &str = "https://securetoken.google.com/";

/// Key material used to check token signatures.
pub enum VerificationKey {
    /// RSA public key in PEM form, for RS256 tokens.
    RsaPem(Vec<u8>),
    /// Shared secret, for HS256 tokens minted by a local issuer.
    SharedSecret(Vec<u8>),
}

/// Failure to load key material.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identity verification key: {message}")]
pub struct VerificationKeyError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    email: Option<String>,
}

/// [`IdentityVerifier`] checking signed ID tokens locally.
pub struct JwtIdentityVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    /// Build a verifier for tokens issued to `project_id`.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationKeyError`] when a PEM key cannot be parsed.
    pub fn new(project_id: &str, key: VerificationKey) -> Result<Self, VerificationKeyError> {
        let (key, algorithm) = match key {
            VerificationKey::RsaPem(pem) => (
                DecodingKey::from_rsa_pem(&pem).map_err(|err| VerificationKeyError {
                    message: err.to_string(),
                })?,
                Algorithm::RS256,
            ),
            VerificationKey::SharedSecret(secret) => {
                (DecodingKey::from_secret(&secret), Algorithm::HS256)
            }
        };
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[format!("{ISSUER_PREFIX}{project_id}")]);
        validation.set_audience(&[project_id]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        Ok(Self { key, validation })
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(
        &self,
        credential: &BearerCredential,
    ) -> Result<VerifiedIdentity, IdentityVerificationError> {
        let token = decode::<IdTokenClaims>(credential.token(), &self.key, &self.validation)
            .map_err(|err| {
                debug!(kind = ?err.kind(), "id token rejected");
                IdentityVerificationError::rejected(rejection_reason(err.kind()))
            })?;
        let raw = token
            .claims
            .email
            .ok_or(IdentityVerificationError::MissingEmail)?;
        let email =
            EmailAddress::new(raw).map_err(|_| IdentityVerificationError::MissingEmail)?;
        Ok(VerifiedIdentity::new(email))
    }
}

fn rejection_reason(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::ExpiredSignature => "token expired",
        ErrorKind::InvalidIssuer => "unexpected issuer",
        ErrorKind::InvalidAudience => "unexpected audience",
        ErrorKind::InvalidSignature => "bad signature",
        ErrorKind::InvalidAlgorithm => "unexpected algorithm",
        _ => "malformed token",
    }
}
