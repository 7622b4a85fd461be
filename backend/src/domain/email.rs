//! Email addresses used as natural keys across collections.
//!
//! Users are identified by email, parcels and payments copy the sender's
//! email, and riders reference their user by email. Surrounding whitespace
//! is trimmed on construction and comparison is otherwise exact, with no
//! case folding. Ownership checks on payment history compare the query text
//! as sent instead, so padded input does not pass them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`EmailAddress::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    /// The address was blank once trimmed.
    #[error("email must not be empty")]
    Empty,
    /// The address lacked a local part or domain.
    #[error("email must contain a local part and a domain separated by '@'")]
    Malformed,
}

/// A trimmed email address containing exactly one `@` with text on both sides.
///
/// # Examples
/// ```
/// use swift_parcel::domain::EmailAddress;
///
/// let email = EmailAddress::new("  a@x.com ").expect("valid email");
/// assert_eq!(email.as_ref(), "a@x.com");
/// assert!(EmailAddress::new("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        match trimmed.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(EmailValidationError::Malformed),
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
