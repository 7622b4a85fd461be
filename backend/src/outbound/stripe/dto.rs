//! Wire shapes for the Stripe Checkout Sessions API.
//!
//! Responses are decoded into these DTOs first and then mapped into domain
//! session records in one pass.

use serde::Deserialize;
use url::Url;

use crate::domain::{
    CheckoutSession, EmailAddress, GatewayPaymentStatus, GatewaySession, MinorUnits,
    SessionMetadata, SessionReference, TransactionId,
};

/// Metadata key carrying the parcel id through checkout.
pub(super) const METADATA_PARCEL_ID: &str = "parcelId";
/// Metadata key carrying the parcel name through checkout.
pub(super) const METADATA_PARCEL_NAME: &str = "parcelName";

#[derive(Debug, Deserialize)]
pub(super) struct CreatedSessionDto {
    pub(super) id: String,
    pub(super) url: Option<String>,
}

/// `payment_intent` is an id unless the caller asked Stripe to expand it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum PaymentIntentDto {
    Id(String),
    Expanded { id: String },
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct CustomerDetailsDto {
    pub(super) email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct MetadataDto {
    #[serde(rename = "parcelId")]
    pub(super) parcel_id: Option<String>,
    #[serde(rename = "parcelName")]
    pub(super) parcel_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SessionDto {
    pub(super) id: String,
    pub(super) payment_intent: Option<PaymentIntentDto>,
    pub(super) payment_status: Option<String>,
    pub(super) amount_total: Option<i64>,
    pub(super) currency: Option<String>,
    pub(super) customer_email: Option<String>,
    #[serde(default)]
    pub(super) customer_details: Option<CustomerDetailsDto>,
    #[serde(default)]
    pub(super) metadata: Option<MetadataDto>,
}

impl CreatedSessionDto {
    pub(super) fn into_domain(self) -> Result<CheckoutSession, String> {
        let reference = SessionReference::new(self.id).map_err(|err| err.to_string())?;
        let raw_url = self
            .url
            .ok_or_else(|| format!("session {reference} has no redirect url"))?;
        let url = Url::parse(&raw_url)
            .map_err(|err| format!("session {reference} has invalid url: {err}"))?;
        Ok(CheckoutSession { reference, url })
    }
}

impl SessionDto {
    pub(super) fn into_domain(self) -> Result<GatewaySession, String> {
        let reference = SessionReference::new(self.id).map_err(|err| err.to_string())?;
        let transaction_id = self
            .payment_intent
            .map(|intent| match intent {
                PaymentIntentDto::Id(id) | PaymentIntentDto::Expanded { id } => id,
            })
            .filter(|id| !id.trim().is_empty())
            .map(TransactionId::new)
            .transpose()
            .map_err(|err| err.to_string())?;
        let amount_total = self
            .amount_total
            .map(MinorUnits::new)
            .transpose()
            .map_err(|err| format!("session {reference} amount_total: {err}"))?;
        // Prefer the prefilled email; fall back to what the customer typed.
        let customer_email = self
            .customer_email
            .or_else(|| self.customer_details.and_then(|details| details.email))
            .and_then(|raw| EmailAddress::new(raw).ok());
        let metadata = self.metadata.unwrap_or_default();
        Ok(GatewaySession {
            reference,
            transaction_id,
            payment_status: self
                .payment_status
                .as_deref()
                .map_or(GatewayPaymentStatus::Unpaid, GatewayPaymentStatus::parse),
            amount_total,
            currency: self.currency,
            customer_email,
            metadata: SessionMetadata {
                parcel_id: metadata.parcel_id,
                parcel_name: metadata.parcel_name,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> GatewaySession {
        serde_json::from_value::<SessionDto>(value)
            .expect("valid dto")
            .into_domain()
            .expect("valid session")
    }

    #[rstest]
    #[case(json!("pi_123"))]
    #[case(json!({"id": "pi_123", "object": "payment_intent"}))]
    fn payment_intent_accepts_ids_and_expanded_objects(#[case] intent: serde_json::Value) {
        let session = decode(json!({
            "id": "cs_test_1",
            "payment_intent": intent,
            "payment_status": "paid",
            "amount_total": 1050,
            "currency": "eur",
            "customer_email": "a@x.com",
            "metadata": {"parcelId": "p1", "parcelName": "Books"}
        }));
        assert_eq!(
            session.transaction_id.as_ref().map(AsRef::as_ref),
            Some("pi_123")
        );
        assert_eq!(session.payment_status, GatewayPaymentStatus::Paid);
        assert_eq!(session.amount_total.map(MinorUnits::get), Some(1050));
        assert_eq!(session.metadata.parcel_name.as_deref(), Some("Books"));
    }

    #[rstest]
    fn open_sessions_have_no_transaction() {
        let session = decode(json!({
            "id": "cs_test_2",
            "payment_intent": null,
            "payment_status": "unpaid",
            "customer_details": {"email": "typed@x.com"}
        }));
        assert!(session.transaction_id.is_none());
        assert_eq!(session.payment_status, GatewayPaymentStatus::Unpaid);
        assert_eq!(
            session.customer_email.as_ref().map(ToString::to_string),
            Some("typed@x.com".to_owned())
        );
    }

    #[rstest]
    fn created_sessions_require_a_redirect_url() {
        let dto: CreatedSessionDto =
            serde_json::from_value(json!({"id": "cs_test_3", "url": null})).expect("valid dto");
        assert!(dto.into_domain().is_err());
    }
}
