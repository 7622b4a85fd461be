//! Driven port for the hosted-checkout payment gateway.
//!
//! The domain owns the request and session shapes so the settlement flow
//! stays independent of the provider's wire format.

use async_trait::async_trait;

use crate::domain::{CheckoutRequest, CheckoutSession, GatewaySession, SessionReference};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while calling the payment gateway.
    pub enum PaymentGatewayError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "payment gateway transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } =>
            "payment gateway timeout: {message}",
        /// The gateway answered with an error status.
        Rejected { status: u16, message: String } =>
            "payment gateway rejected request ({status}): {message}",
        /// The gateway's response could not be decoded.
        Decode { message: String } =>
            "payment gateway response decode failed: {message}",
        /// The adapter refused the request before sending it.
        InvalidRequest { message: String } =>
            "payment gateway request invalid: {message}",
    }
}

impl PaymentGatewayError {
    /// Whether the outcome of the call is unknown rather than failed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Port for opening and reading back checkout sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a single-item checkout for a parcel's shipping fee.
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentGatewayError>;

    /// Read the gateway's current view of a session.
    async fn retrieve_session(
        &self,
        reference: &SessionReference,
    ) -> Result<GatewaySession, PaymentGatewayError>;
}
