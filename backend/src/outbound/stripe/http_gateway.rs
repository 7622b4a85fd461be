//! Reqwest-backed Stripe Checkout adapter.
//!
//! Owns transport details only: form encoding, bearer authentication, the
//! client timeout, HTTP status mapping, and JSON decoding into domain
//! session records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;
use zeroize::Zeroizing;

use super::dto::{CreatedSessionDto, METADATA_PARCEL_ID, METADATA_PARCEL_NAME, SessionDto};
use crate::domain::ports::{PaymentGateway, PaymentGatewayError};
use crate::domain::{CheckoutRequest, CheckoutSession, GatewaySession, SessionReference};

/// Default Stripe REST endpoint.
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

const SESSIONS_PATH: &str = "v1/checkout/sessions";

/// Connection settings for [`StripeCheckoutGateway`].
pub struct StripeGatewayConfig {
    /// Secret API key, sent as a bearer token.
    pub secret_key: Zeroizing<String>,
    /// API root, overridable for test doubles.
    pub api_base: Url,
    /// Public site the customer returns to after checkout.
    pub site_domain: Url,
    /// ISO currency code for line items.
    pub currency: String,
    /// Upper bound on a single API call.
    pub timeout: Duration,
}

/// Checkout gateway talking to the Stripe REST API.
pub struct StripeCheckoutGateway {
    client: Client,
    secret_key: Zeroizing<String>,
    sessions_endpoint: Url,
    site_domain: String,
    currency: String,
}

impl StripeCheckoutGateway {
    /// Build the adapter and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentGatewayError::InvalidRequest`] when the API base cannot
    /// be joined with the sessions path, and
    /// [`PaymentGatewayError::Transport`] when the client cannot be built.
    pub fn new(config: StripeGatewayConfig) -> Result<Self, PaymentGatewayError> {
        let sessions_endpoint = with_trailing_slash(config.api_base)
            .join(SESSIONS_PATH)
            .map_err(|err| PaymentGatewayError::invalid_request(err.to_string()))?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| PaymentGatewayError::transport(err.to_string()))?;
        Ok(Self {
            client,
            secret_key: config.secret_key,
            sessions_endpoint,
            site_domain: config.site_domain.as_str().trim_end_matches('/').to_owned(),
            currency: config.currency.to_lowercase(),
        })
    }

    fn session_endpoint(&self, reference: &SessionReference) -> Result<Url, PaymentGatewayError> {
        let mut url = self.sessions_endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| PaymentGatewayError::invalid_request("API base cannot hold a path"))?
            .push(reference.as_ref());
        Ok(url)
    }
}

fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

/// Form body for a single-item payment session.
fn checkout_form(
    request: &CheckoutRequest,
    currency: &str,
    site_domain: &str,
) -> Vec<(String, String)> {
    vec![
        ("mode".into(), "payment".into()),
        (
            "line_items[0][price_data][currency]".into(),
            currency.to_owned(),
        ),
        (
            "line_items[0][price_data][unit_amount]".into(),
            request.cost.get().to_string(),
        ),
        (
            "line_items[0][price_data][product_data][name]".into(),
            format!("Please pay for: {}", request.parcel_name),
        ),
        ("line_items[0][quantity]".into(), "1".into()),
        ("customer_email".into(), request.sender_email.to_string()),
        (
            format!("metadata[{METADATA_PARCEL_ID}]"),
            request.parcel_id.to_string(),
        ),
        (
            format!("metadata[{METADATA_PARCEL_NAME}]"),
            request.parcel_name.clone(),
        ),
        (
            "success_url".into(),
            format!(
                "{site_domain}/dashboard/payment-success?session_id={{CHECKOUT_SESSION_ID}}"
            ),
        ),
        (
            "cancel_url".into(),
            format!("{site_domain}/dashboard/payment-cancelled"),
        ),
    ]
}

#[async_trait]
impl PaymentGateway for StripeCheckoutGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentGatewayError> {
        let response = self
            .client
            .post(self.sessions_endpoint.clone())
            .bearer_auth(self.secret_key.as_str())
            .form(&checkout_form(request, &self.currency, &self.site_domain))
            .send()
            .await
            .map_err(map_transport_error)?;
        let body = read_success_body(response).await?;
        let dto: CreatedSessionDto = serde_json::from_slice(&body).map_err(|err| {
            PaymentGatewayError::decode(format!("invalid checkout session payload: {err}"))
        })?;
        dto.into_domain().map_err(PaymentGatewayError::decode)
    }

    async fn retrieve_session(
        &self,
        reference: &SessionReference,
    ) -> Result<GatewaySession, PaymentGatewayError> {
        let response = self
            .client
            .get(self.session_endpoint(reference)?)
            .bearer_auth(self.secret_key.as_str())
            .send()
            .await
            .map_err(map_transport_error)?;
        let body = read_success_body(response).await?;
        let dto: SessionDto = serde_json::from_slice(&body).map_err(|err| {
            PaymentGatewayError::decode(format!("invalid checkout session payload: {err}"))
        })?;
        dto.into_domain().map_err(PaymentGatewayError::decode)
    }
}

async fn read_success_body(response: reqwest::Response) -> Result<Vec<u8>, PaymentGatewayError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if status.is_success() {
        Ok(body.to_vec())
    } else {
        Err(map_status_error(status, &body))
    }
}

fn map_transport_error(error: reqwest::Error) -> PaymentGatewayError {
    if error.is_timeout() {
        PaymentGatewayError::timeout(error.to_string())
    } else {
        PaymentGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PaymentGatewayError {
    let message = error_message(body).unwrap_or_else(|| format!("status {}", status.as_u16()));
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PaymentGatewayError::timeout(message)
        }
        _ => PaymentGatewayError::rejected(status.as_u16(), message),
    }
}

/// Extract `error.message` from a Stripe error envelope.
fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_owned)
}
