//! Driving port for checkout and settlement.
//!
//! A checkout attempt moves through these states, keyed by the gateway's
//! session reference:
//!
//! - `Initiated`: [`PaymentSettlement::create_session`] opened a session and
//!   the gateway holds its state.
//! - `Reconciling`: the client came back with the reference and
//!   [`PaymentSettlement::reconcile`] re-reads the session from the gateway.
//! - Terminal: [`ReconciliationResult::Duplicate`],
//!   [`ReconciliationResult::Settled`], or [`ReconciliationResult::Unsettled`].

use async_trait::async_trait;

use crate::domain::{
    CheckoutRequest, CheckoutSession, Error, GatewayPaymentStatus, InsertOutcome, Payment,
    SessionReference, TrackingId, TransactionId, UpdateOutcome,
};

/// Why a reconciliation made no changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsettledReason {
    /// The gateway reports the session as not paid.
    NotPaid(GatewayPaymentStatus),
    /// The gateway did not answer in time; the outcome is unknown.
    GatewayTimeout,
}

/// Writes performed by a first-seen paid session.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementReceipt {
    pub parcel_update: UpdateOutcome,
    pub payment_insert: InsertOutcome,
    pub payment: Payment,
}

impl SettlementReceipt {
    pub fn tracking_id(&self) -> &TrackingId {
        &self.payment.tracking_id
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.payment.transaction_id
    }
}

/// Terminal state of one reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconciliationResult {
    /// The transaction was already recorded; nothing was written.
    Duplicate {
        transaction_id: TransactionId,
        tracking_id: TrackingId,
    },
    /// The payment was recorded now.
    Settled(SettlementReceipt),
    /// Nothing was written.
    Unsettled(UnsettledReason),
}

/// Domain use-case port for paying shipping fees.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentSettlement: Send + Sync {
    /// Open a hosted checkout for a parcel and return where to send the client.
    async fn create_session(&self, request: CheckoutRequest) -> Result<CheckoutSession, Error>;

    /// Settle a session exactly once, trusting only the gateway's view of it.
    async fn reconcile(&self, reference: &SessionReference)
    -> Result<ReconciliationResult, Error>;
}
