//! Checkout sessions held by the payment gateway.
//!
//! The gateway owns the session state between the redirect to its hosted
//! page and the client's return. The server only ever trusts what it reads
//! back from the gateway by session reference.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::{EmailAddress, MinorUnits, ParcelId, TransactionId};

/// Validation errors for [`SessionReference`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionReferenceValidationError {
    #[error("session_id is required")]
    Empty,
}

/// Opaque gateway token identifying one checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionReference(String);

impl SessionReference {
    pub fn new(raw: impl Into<String>) -> Result<Self, SessionReferenceValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SessionReferenceValidationError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for SessionReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SessionReference> for String {
    fn from(value: SessionReference) -> Self {
        value.0
    }
}

impl TryFrom<String> for SessionReference {
    type Error = SessionReferenceValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Payment status as reported by the gateway for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayPaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,
    #[serde(other)]
    Unknown,
}

impl GatewayPaymentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
            Self::NoPaymentRequired => "no_payment_required",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a gateway or stored value; unrecognised values map to `Unknown`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "paid" => Self::Paid,
            "unpaid" => Self::Unpaid,
            "no_payment_required" => Self::NoPaymentRequired,
            _ => Self::Unknown,
        }
    }
}

/// Request to open a hosted checkout for one parcel's shipping fee.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub parcel_id: ParcelId,
    pub sender_email: EmailAddress,
    pub parcel_name: String,
    pub cost: MinorUnits,
}

/// A session the gateway opened, with the URL the client is redirected to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub reference: SessionReference,
    pub url: Url,
}

/// Opaque values the server attached to the session at creation time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMetadata {
    pub parcel_id: Option<String>,
    pub parcel_name: Option<String>,
}

/// The gateway's authoritative view of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySession {
    pub reference: SessionReference,
    /// Present once the customer has started paying.
    pub transaction_id: Option<TransactionId>,
    pub payment_status: GatewayPaymentStatus,
    pub amount_total: Option<MinorUnits>,
    pub currency: Option<String>,
    pub customer_email: Option<EmailAddress>,
    pub metadata: SessionMetadata,
}
