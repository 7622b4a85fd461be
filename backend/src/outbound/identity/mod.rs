//! Identity verification adapters implementing the `IdentityVerifier` port.

mod jwt_verifier;

pub use jwt_verifier::{JwtIdentityVerifier, VerificationKey, VerificationKeyError};
