//! Parcels submitted for shipping.
//!
//! A parcel starts unpaid. The settlement flow is the only writer that moves
//! it to paid, and it does so together with assigning the tracking id, so a
//! parcel carries a tracking id exactly when it is paid. Once assigned the
//! tracking id never changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EmailAddress, MinorUnits, ParcelId, PassthroughFields, TrackingId};

/// Document keys owned by the typed part of a parcel.
pub const PARCEL_RESERVED_FIELDS: &[&str] = &[
    "id",
    "_id",
    "senderEmail",
    "cost",
    "paymentStatus",
    "trackingId",
    "createdAt",
];

/// Whether the shipping fee has been collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl PaymentStatus {
    /// Stored column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }

    /// Parse a stored column value.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "unpaid" => Some(Self::Unpaid),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

/// Validation errors raised when rehydrating stored parcels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParcelValidationError {
    /// A paid parcel lacked a tracking id, or an unpaid one carried one.
    #[error("parcel tracking id must be present exactly when the parcel is paid")]
    TrackingMismatch,
}

/// Client submission for a new parcel.
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelDraft {
    pub sender_email: EmailAddress,
    pub cost: MinorUnits,
    pub details: PassthroughFields,
}

/// A stored parcel.
///
/// ## Invariants
/// - `tracking_id.is_some()` iff `payment_status == PaymentStatus::Paid`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parcel {
    id: ParcelId,
    sender_email: EmailAddress,
    cost: MinorUnits,
    payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    tracking_id: Option<TrackingId>,
    created_at: DateTime<Utc>,
    #[serde(flatten)]
    details: PassthroughFields,
}

impl Parcel {
    /// Accept a draft as a new unpaid parcel.
    #[must_use]
    pub fn submit(id: ParcelId, draft: ParcelDraft, created_at: DateTime<Utc>) -> Self {
        let ParcelDraft {
            sender_email,
            cost,
            details,
        } = draft;
        Self {
            id,
            sender_email,
            cost,
            payment_status: PaymentStatus::Unpaid,
            tracking_id: None,
            created_at,
            details,
        }
    }

    /// Rebuild a parcel from stored columns, checking the payment invariant.
    pub fn restore(
        id: ParcelId,
        draft: ParcelDraft,
        payment_status: PaymentStatus,
        tracking_id: Option<TrackingId>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ParcelValidationError> {
        let consistent = matches!(
            (payment_status, &tracking_id),
            (PaymentStatus::Paid, Some(_)) | (PaymentStatus::Unpaid, None)
        );
        if !consistent {
            return Err(ParcelValidationError::TrackingMismatch);
        }
        let mut parcel = Self::submit(id, draft, created_at);
        parcel.payment_status = payment_status;
        parcel.tracking_id = tracking_id;
        Ok(parcel)
    }

    /// Mark the parcel paid.
    ///
    /// The candidate tracking id is only taken when none is assigned yet.
    /// Returns whether any field changed.
    pub fn mark_paid(&mut self, candidate: &TrackingId) -> bool {
        if self.tracking_id.is_some() {
            return false;
        }
        self.payment_status = PaymentStatus::Paid;
        self.tracking_id = Some(candidate.clone());
        true
    }

    pub fn id(&self) -> ParcelId {
        self.id
    }

    pub fn sender_email(&self) -> &EmailAddress {
        &self.sender_email
    }

    pub fn cost(&self) -> MinorUnits {
        self.cost
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn tracking_id(&self) -> Option<&TrackingId> {
        self.tracking_id.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn details(&self) -> &PassthroughFields {
        &self.details
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use serde_json::{Map, json};

    #[fixture]
    fn draft() -> ParcelDraft {
        let mut extra = Map::new();
        extra.insert("parcelName".into(), json!("Books"));
        ParcelDraft {
            sender_email: EmailAddress::new("a@x.com").expect("valid email"),
            cost: MinorUnits::new(1000).expect("non-negative"),
            details: PassthroughFields::from_map(extra, PARCEL_RESERVED_FIELDS),
        }
    }

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5)
            .single()
            .expect("valid timestamp")
    }

    fn tracking(raw: &str) -> TrackingId {
        TrackingId::parse(raw).expect("valid tracking id")
    }

    #[rstest]
    fn submitted_parcels_start_unpaid(draft: ParcelDraft) {
        let parcel = Parcel::submit(ParcelId::random(), draft, created_at());
        assert_eq!(parcel.payment_status(), PaymentStatus::Unpaid);
        assert!(parcel.tracking_id().is_none());
    }

    #[rstest]
    fn mark_paid_keeps_the_first_tracking_id(draft: ParcelDraft) {
        let mut parcel = Parcel::submit(ParcelId::random(), draft, created_at());
        let first = tracking("SWIFT-20250102-AAAAAA");
        assert!(parcel.mark_paid(&first));
        assert!(!parcel.mark_paid(&tracking("SWIFT-20250102-BBBBBB")));
        assert_eq!(parcel.tracking_id(), Some(&first));
        assert_eq!(parcel.payment_status(), PaymentStatus::Paid);
    }

    #[rstest]
    #[case(PaymentStatus::Paid, None)]
    #[case(PaymentStatus::Unpaid, Some(tracking("SWIFT-20250102-AAAAAA")))]
    fn restore_rejects_inconsistent_payment_state(
        draft: ParcelDraft,
        #[case] status: PaymentStatus,
        #[case] tracking_id: Option<TrackingId>,
    ) {
        let result = Parcel::restore(ParcelId::random(), draft, status, tracking_id, created_at());
        assert_eq!(result, Err(ParcelValidationError::TrackingMismatch));
    }

    #[rstest]
    fn serialises_typed_and_passthrough_fields_together(draft: ParcelDraft) {
        let parcel = Parcel::submit(ParcelId::random(), draft, created_at());
        let value = serde_json::to_value(&parcel).expect("serialise");
        assert_eq!(value["senderEmail"], json!("a@x.com"));
        assert_eq!(value["cost"], json!(10.0));
        assert_eq!(value["paymentStatus"], json!("unpaid"));
        assert_eq!(value["parcelName"], json!("Books"));
        assert!(value.get("trackingId").is_none());
    }
}
