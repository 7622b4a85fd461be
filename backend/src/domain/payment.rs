//! Settled payments.
//!
//! One payment row exists per gateway transaction. The transaction id is the
//! idempotency key of the settlement flow: the store rejects a second row for
//! the same id and callers treat that rejection as a replay.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EmailAddress, GatewayPaymentStatus, MinorUnits, ParcelId, PaymentId, TrackingId};

/// Validation errors for [`TransactionId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionIdValidationError {
    #[error("transaction id must not be empty")]
    Empty,
}

/// Gateway-issued payment reference (a Stripe payment intent id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(raw: impl Into<String>) -> Result<Self, TransactionIdValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(TransactionIdValidationError::Empty);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for TransactionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TransactionId> for String {
    fn from(value: TransactionId) -> Self {
        value.0
    }
}

impl TryFrom<String> for TransactionId {
    type Error = TransactionIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A recorded settlement.
///
/// `tracking_id` is a copy of the parcel's tracking id at settlement time and
/// `amount` is the gateway-reported total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub transaction_id: TransactionId,
    pub amount: MinorUnits,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<EmailAddress>,
    pub parcel_id: ParcelId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parcel_name: Option<String>,
    pub payment_status: GatewayPaymentStatus,
    pub paid_at: DateTime<Utc>,
    pub tracking_id: TrackingId,
}

impl Payment {
    /// Replace the tracking id with the one the parcel actually carries.
    #[must_use]
    pub fn with_tracking_id(mut self, tracking_id: TrackingId) -> Self {
        self.tracking_id = tracking_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn transaction_ids_reject_blank_values() {
        assert_eq!(
            TransactionId::new(" "),
            Err(TransactionIdValidationError::Empty)
        );
    }

    #[test]
    fn serialises_amount_in_major_units() {
        let payment = Payment {
            id: PaymentId::random(),
            transaction_id: TransactionId::new("pi_1").expect("valid"),
            amount: MinorUnits::new(1000).expect("non-negative"),
            currency: "eur".into(),
            customer_email: Some(EmailAddress::new("a@x.com").expect("valid")),
            parcel_id: ParcelId::random(),
            parcel_name: Some("Books".into()),
            payment_status: GatewayPaymentStatus::Paid,
            paid_at: Utc
                .with_ymd_and_hms(2025, 1, 2, 0, 0, 0)
                .single()
                .expect("valid timestamp"),
            tracking_id: TrackingId::parse("SWIFT-20250102-ABCDEF").expect("valid"),
        };
        let value = serde_json::to_value(&payment).expect("serialise");
        assert_eq!(value["amount"], json!(10.0));
        assert_eq!(value["transactionId"], json!("pi_1"));
        assert_eq!(value["paymentStatus"], json!("paid"));
        assert_eq!(value["trackingId"], json!("SWIFT-20250102-ABCDEF"));
    }
}
