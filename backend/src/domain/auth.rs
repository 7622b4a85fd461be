//! Authentication primitives: bearer credentials and verified identities.
//!
//! Keep header parsing outside the domain by exposing a constructor that
//! validates the raw `Authorization` value before anything talks to the
//! identity verifier.

use std::fmt;

use zeroize::Zeroizing;

use super::EmailAddress;

/// Reasons a raw authorisation header is not a usable bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialValidationError {
    /// The header used a scheme other than `Bearer`.
    #[error("authorization scheme must be Bearer")]
    WrongScheme,
    /// The token part was blank.
    #[error("bearer token must not be empty")]
    EmptyToken,
}

/// A bearer token lifted from an `Authorization` header.
///
/// The token is wiped from memory on drop and never printed.
///
/// # Examples
/// ```
/// use swift_parcel::domain::BearerCredential;
///
/// let credential = BearerCredential::from_header("Bearer abc.def").expect("bearer");
/// assert_eq!(credential.token(), "abc.def");
/// assert!(BearerCredential::from_header("Basic abc").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BearerCredential {
    token: Zeroizing<String>,
}

impl BearerCredential {
    /// Parse an `Authorization` header value.
    ///
    /// The scheme match is case-insensitive.
    pub fn from_header(raw: &str) -> Result<Self, CredentialValidationError> {
        let trimmed = raw.trim();
        let (scheme, token) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(CredentialValidationError::WrongScheme);
        }
        let token = token.trim();
        if token.is_empty() {
            return Err(CredentialValidationError::EmptyToken);
        }
        Ok(Self {
            token: Zeroizing::new(token.to_owned()),
        })
    }

    /// Raw token for the verifier.
    pub fn token(&self) -> &str {
        self.token.as_str()
    }
}

impl fmt::Debug for BearerCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerCredential")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Identity established by a successfully verified credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    email: EmailAddress,
}

impl VerifiedIdentity {
    pub fn new(email: EmailAddress) -> Self {
        Self { email }
    }

    /// Email claim carried by the verified token.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Bearer abc", "abc")]
    #[case("bearer   abc ", "abc")]
    #[case("BEARER x.y.z", "x.y.z")]
    fn accepts_bearer_headers(#[case] raw: &str, #[case] expected: &str) {
        let credential = BearerCredential::from_header(raw).expect("bearer credential");
        assert_eq!(credential.token(), expected);
    }

    #[rstest]
    #[case("", CredentialValidationError::WrongScheme)]
    #[case("Basic abc", CredentialValidationError::WrongScheme)]
    #[case("Bearer", CredentialValidationError::EmptyToken)]
    #[case("Bearer   ", CredentialValidationError::EmptyToken)]
    fn rejects_other_headers(#[case] raw: &str, #[case] expected: CredentialValidationError) {
        assert_eq!(BearerCredential::from_header(raw), Err(expected));
    }

    #[rstest]
    fn debug_output_redacts_the_token() {
        let credential = BearerCredential::from_header("Bearer secret").expect("bearer");
        assert!(!format!("{credential:?}").contains("secret"));
    }
}
