//! Checkout settlement.
//!
//! [`SettlementService`] opens hosted checkouts and reconciles returning
//! sessions against the gateway. Reconciliation is keyed on the gateway's
//! transaction id: a recorded transaction is reported as a duplicate and
//! never written again. The store enforces that uniqueness, so two concurrent
//! reconciliations of one session produce one payment and both callers see
//! the same tracking id.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::domain::ports::{
    PaymentGateway, PaymentGatewayError, PaymentRepository, PaymentRepositoryError,
    PaymentSettlement, ReconciliationResult, SettlementReceipt, UnsettledReason,
};
use crate::domain::{
    CheckoutRequest, CheckoutSession, Error, GatewayPaymentStatus, GatewaySession, ParcelId,
    Payment, PaymentId, SessionReference, TrackingIdGenerator, TransactionId,
};

/// Default bound on a single gateway round-trip.
pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Tunables for [`SettlementService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementConfig {
    /// Bound on each gateway call.
    pub gateway_timeout: Duration,
    /// Currency recorded when the gateway omits one.
    pub currency: String,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
            currency: "eur".to_owned(),
        }
    }
}

fn map_gateway_error(error: PaymentGatewayError) -> Error {
    match error {
        PaymentGatewayError::InvalidRequest { message } => {
            Error::invalid_request(format!("checkout request rejected: {message}"))
        }
        PaymentGatewayError::Decode { message } => {
            Error::internal(format!("payment gateway response unreadable: {message}"))
        }
        other => Error::service_unavailable(format!("payment gateway unavailable: {other}")),
    }
}

fn map_repository_error(error: PaymentRepositoryError) -> Error {
    match error {
        PaymentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("payment repository unavailable: {message}"))
        }
        PaymentRepositoryError::Query { message } => {
            Error::internal(format!("payment repository error: {message}"))
        }
        PaymentRepositoryError::DuplicateTransaction { transaction_id } => Error::internal(
            format!("payment for transaction {transaction_id} recorded concurrently"),
        ),
    }
}

/// Settlement reconciler implementing [`PaymentSettlement`].
#[derive(Clone)]
pub struct SettlementService<G, P> {
    gateway: Arc<G>,
    payments: Arc<P>,
    tracking_ids: TrackingIdGenerator,
    clock: Arc<dyn Clock>,
    config: SettlementConfig,
}

impl<G, P> SettlementService<G, P> {
    /// Create a reconciler over a gateway and payment store.
    pub fn new(
        gateway: Arc<G>,
        payments: Arc<P>,
        clock: Arc<dyn Clock>,
        config: SettlementConfig,
    ) -> Self {
        Self {
            gateway,
            payments,
            tracking_ids: TrackingIdGenerator::new(Arc::clone(&clock)),
            clock,
            config,
        }
    }
}

impl<G, P> SettlementService<G, P>
where
    G: PaymentGateway,
    P: PaymentRepository,
{
    /// Fetch the session, treating a timeout as an unknown outcome.
    async fn fetch_session(
        &self,
        reference: &SessionReference,
    ) -> Result<Option<GatewaySession>, Error> {
        match timeout(
            self.config.gateway_timeout,
            self.gateway.retrieve_session(reference),
        )
        .await
        {
            Ok(Ok(session)) => Ok(Some(session)),
            Ok(Err(err)) if err.is_timeout() => {
                warn!(session = %reference, error = %err, "gateway timed out during reconcile");
                Ok(None)
            }
            Ok(Err(err)) => {
                warn!(session = %reference, error = %err, "gateway failed during reconcile");
                Err(map_gateway_error(err))
            }
            Err(_) => {
                warn!(
                    session = %reference,
                    timeout_ms = self.config.gateway_timeout.as_millis(),
                    "gateway exceeded reconcile timeout"
                );
                Ok(None)
            }
        }
    }

    async fn existing(&self, transaction_id: &TransactionId) -> Result<Option<Payment>, Error> {
        self.payments
            .find_by_transaction_id(transaction_id)
            .await
            .map_err(map_repository_error)
    }

    fn duplicate(payment: Payment) -> ReconciliationResult {
        ReconciliationResult::Duplicate {
            transaction_id: payment.transaction_id,
            tracking_id: payment.tracking_id,
        }
    }

    fn build_payment(
        &self,
        session: GatewaySession,
        transaction_id: TransactionId,
    ) -> Result<Payment, Error> {
        let parcel_id = session
            .metadata
            .parcel_id
            .as_deref()
            .and_then(|raw| ParcelId::new(raw).ok())
            .ok_or_else(|| Error::invalid_request("checkout session is not linked to a parcel"))?;
        let amount = session
            .amount_total
            .ok_or_else(|| Error::internal("paid checkout session reports no amount"))?;
        Ok(Payment {
            id: PaymentId::random(),
            transaction_id,
            amount,
            currency: session
                .currency
                .unwrap_or_else(|| self.config.currency.to_lowercase()),
            customer_email: session.customer_email,
            parcel_id,
            parcel_name: session.metadata.parcel_name,
            payment_status: GatewayPaymentStatus::Paid,
            paid_at: self.clock.utc(),
            tracking_id: self.tracking_ids.generate(),
        })
    }
}

#[async_trait]
impl<G, P> PaymentSettlement for SettlementService<G, P>
where
    G: PaymentGateway,
    P: PaymentRepository,
{
    async fn create_session(&self, request: CheckoutRequest) -> Result<CheckoutSession, Error> {
        let session = match timeout(
            self.config.gateway_timeout,
            self.gateway.create_checkout_session(&request),
        )
        .await
        {
            Ok(result) => result.map_err(|err| {
                warn!(parcel = %request.parcel_id, error = %err, "checkout session creation failed");
                map_gateway_error(err)
            })?,
            Err(_) => {
                warn!(parcel = %request.parcel_id, "checkout session creation timed out");
                return Err(Error::service_unavailable("payment gateway timed out"));
            }
        };
        info!(
            parcel = %request.parcel_id,
            session = %session.reference,
            amount_minor = request.cost.get(),
            "checkout session created"
        );
        Ok(session)
    }

    async fn reconcile(
        &self,
        reference: &SessionReference,
    ) -> Result<ReconciliationResult, Error> {
        let Some(session) = self.fetch_session(reference).await? else {
            return Ok(ReconciliationResult::Unsettled(UnsettledReason::GatewayTimeout));
        };

        if let Some(transaction_id) = &session.transaction_id {
            if let Some(existing) = self.existing(transaction_id).await? {
                info!(transaction = %transaction_id, "settlement replayed");
                return Ok(Self::duplicate(existing));
            }
        }

        if session.payment_status != GatewayPaymentStatus::Paid {
            info!(
                session = %reference,
                status = session.payment_status.as_str(),
                "session not paid"
            );
            return Ok(ReconciliationResult::Unsettled(UnsettledReason::NotPaid(
                session.payment_status,
            )));
        }

        let transaction_id = session
            .transaction_id
            .clone()
            .ok_or_else(|| Error::internal("paid checkout session has no payment reference"))?;
        let payment = self.build_payment(session, transaction_id.clone())?;

        match self.payments.record_settlement(&payment).await {
            Ok(write) => {
                if write.parcel_update.matched_count == 0 {
                    warn!(parcel = %payment.parcel_id, "settled payment for a missing parcel");
                }
                info!(
                    transaction = %transaction_id,
                    tracking = %write.payment.tracking_id,
                    "payment settled"
                );
                Ok(ReconciliationResult::Settled(SettlementReceipt {
                    parcel_update: write.parcel_update,
                    payment_insert: write.payment_insert,
                    payment: write.payment,
                }))
            }
            Err(PaymentRepositoryError::DuplicateTransaction { .. }) => {
                info!(transaction = %transaction_id, "lost settlement race");
                self.existing(&transaction_id)
                    .await?
                    .map(Self::duplicate)
                    .ok_or_else(|| {
                        Error::internal(format!(
                            "payment for transaction {transaction_id} vanished after conflict"
                        ))
                    })
            }
            Err(err) => Err(map_repository_error(err)),
        }
    }
}

#[cfg(test)]
#[path = "settlement_service_tests.rs"]
mod tests;
