//! Checkout, settlement and payment history handlers.
//!
//! ```text
//! POST  /create-checkout-session {"cost":12,"parcelName":"Books","parcelId":"…","senderEmail":"…"}
//! PATCH /payment-success?session_id=cs_test_…
//! GET   /payments?email=ada@example.com      (Authorization: Bearer …)
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::ports::ReconciliationResult;
use crate::domain::{
    ApiResult, CheckoutRequest, Error, InsertOutcome, ParcelId, Payment, SessionReference,
    TrackingId, TransactionId, UpdateOutcome,
};
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{InsertOutcomeSchema, PaymentSchema, UpdateOutcomeSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_record_id, require_amount, require_email, require_str,
};

/// Reply for a transaction that was already recorded.
pub const ALREADY_EXISTS_MESSAGE: &str = "already exists";

/// Hosted checkout location.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CheckoutResponse {
    #[schema(example = "https://checkout.stripe.com/c/pay/cs_test_a1")]
    pub url: String,
}

/// Body of `POST /create-checkout-session`.
#[derive(utoipa::ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CheckoutRequestSchema {
    /// Major units, as a number or numeric string.
    cost: f64,
    parcel_name: String,
    parcel_id: String,
    sender_email: String,
}

/// Query string for `PATCH /payment-success`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SettlementQuery {
    /// Checkout session reference the gateway redirected back with.
    pub session_id: Option<String>,
}

/// Query string for `GET /payments`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct PaymentHistoryParams {
    /// Customer whose payments to list; must be the caller.
    pub email: Option<String>,
}

/// The transaction was recorded by an earlier call.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateSettlement {
    #[schema(example = "already exists")]
    pub messege: String,
    #[schema(value_type = String)]
    pub transaction_id: TransactionId,
    #[schema(value_type = String)]
    pub tracking_id: TrackingId,
}

/// The payment was recorded by this call.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordedSettlement {
    pub success: bool,
    #[schema(value_type = UpdateOutcomeSchema)]
    pub modify_parcel: UpdateOutcome,
    #[schema(value_type = String)]
    pub tracking_id: TrackingId,
    #[schema(value_type = String)]
    pub transaction_id: TransactionId,
    #[schema(value_type = InsertOutcomeSchema)]
    pub payment_info: InsertOutcome,
}

/// Nothing was written.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct NoSettlement {
    pub success: bool,
}

/// Settlement reply; the shape depends on what reconciliation did.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum SettlementResponse {
    Duplicate(DuplicateSettlement),
    Settled(RecordedSettlement),
    Unsettled(NoSettlement),
}

impl From<ReconciliationResult> for SettlementResponse {
    fn from(result: ReconciliationResult) -> Self {
        match result {
            ReconciliationResult::Duplicate {
                transaction_id,
                tracking_id,
            } => Self::Duplicate(DuplicateSettlement {
                messege: ALREADY_EXISTS_MESSAGE.to_owned(),
                transaction_id,
                tracking_id,
            }),
            ReconciliationResult::Settled(receipt) => Self::Settled(RecordedSettlement {
                success: true,
                modify_parcel: receipt.parcel_update,
                tracking_id: receipt.payment.tracking_id,
                transaction_id: receipt.payment.transaction_id,
                payment_info: receipt.payment_insert,
            }),
            ReconciliationResult::Unsettled(_) => Self::Unsettled(NoSettlement { success: false }),
        }
    }
}

fn checkout_request(body: &Map<String, Value>) -> Result<CheckoutRequest, Error> {
    let parcel_id_field = FieldName::new("parcelId");
    let parcel_id: ParcelId =
        parse_record_id(require_str(body, parcel_id_field)?, parcel_id_field)?;
    Ok(CheckoutRequest {
        parcel_id,
        sender_email: require_email(body, FieldName::new("senderEmail"))?,
        parcel_name: require_str(body, FieldName::new("parcelName"))?.to_owned(),
        cost: require_amount(body.get("cost"), FieldName::new("cost"))?,
    })
}

/// Open a hosted checkout for a parcel's shipping fee.
#[utoipa::path(
    post,
    path = "/create-checkout-session",
    request_body = CheckoutRequestSchema,
    responses(
        (status = 200, description = "Where to send the customer", body = CheckoutResponse),
        (status = 400, description = "Invalid checkout request", body = Error),
        (status = 503, description = "Payment gateway unavailable", body = Error)
    ),
    tags = ["payments"],
    operation_id = "createCheckoutSession",
    security([])
)]
#[post("/create-checkout-session")]
pub async fn create_checkout_session(
    state: web::Data<HttpState>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<web::Json<CheckoutResponse>> {
    let request = checkout_request(&payload)?;
    let session = state.settlement.create_session(request).await?;
    Ok(web::Json(CheckoutResponse {
        url: session.url.into(),
    }))
}

/// Settle a checkout session exactly once.
///
/// Safe to repeat: once a transaction is recorded every later call gets the
/// already-exists reply with the original tracking id.
#[utoipa::path(
    patch,
    path = "/payment-success",
    params(SettlementQuery),
    responses(
        (status = 200, description = "Settlement outcome", body = SettlementResponse),
        (status = 400, description = "Missing or malformed session id", body = Error),
        (status = 503, description = "Payment gateway unavailable", body = Error)
    ),
    tags = ["payments"],
    operation_id = "settlePayment",
    security([])
)]
#[patch("/payment-success")]
pub async fn settle_payment(
    state: web::Data<HttpState>,
    query: web::Query<SettlementQuery>,
) -> ApiResult<HttpResponse> {
    let field = FieldName::new("session_id");
    let raw = query
        .session_id
        .as_deref()
        .ok_or_else(|| missing_field_error(field))?;
    let reference = SessionReference::new(raw).map_err(|_| missing_field_error(field))?;
    let result = state.settlement.reconcile(&reference).await?;
    Ok(HttpResponse::Ok().json(SettlementResponse::from(result)))
}

/// List the caller's payments, most recent first.
///
/// Without `email` the caller's own history is returned; any value other than
/// the caller's exact email, malformed or padded ones included, is refused
/// with 403.
#[utoipa::path(
    get,
    path = "/payments",
    params(PaymentHistoryParams),
    responses(
        (status = 200, description = "Payments, most recent first", body = [PaymentSchema]),
        (status = 401, description = "Missing or invalid bearer token", body = Error),
        (status = 403, description = "Email is not the caller's", body = Error)
    ),
    tags = ["payments"],
    operation_id = "listPayments",
    security(("BearerAuth" = []))
)]
#[get("/payments")]
pub async fn list_payments(
    auth: Authenticated,
    state: web::Data<HttpState>,
    query: web::Query<PaymentHistoryParams>,
) -> ApiResult<web::Json<Vec<Payment>>> {
    let requested = query
        .email
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(str::to_owned);
    let payments = state
        .payment_history
        .history(auth.identity(), requested)
        .await?;
    Ok(web::Json(payments))
}

#[cfg(test)]
#[path = "payments_tests.rs"]
mod tests;
