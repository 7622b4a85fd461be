//! Port abstraction for payment persistence and settlement writes.
//!
//! Settlement touches two collections: the parcel is marked paid and the
//! payment row is inserted. Adapters must apply both writes atomically and
//! must reject a second payment row for an already recorded transaction id
//! with [`PaymentRepositoryError::DuplicateTransaction`], leaving the parcel
//! untouched in that case.

use async_trait::async_trait;

use crate::domain::{EmailAddress, InsertOutcome, Payment, TransactionId, UpdateOutcome};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by payment repository adapters.
    pub enum PaymentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "payment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "payment repository query failed: {message}",
        /// A payment for this transaction was already recorded.
        DuplicateTransaction { transaction_id: String } =>
            "payment for transaction {transaction_id} already recorded",
    }
}

/// Result of an atomic settlement write.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementWrite {
    /// Outcome of marking the parcel paid.
    pub parcel_update: UpdateOutcome,
    /// Outcome of inserting the payment row.
    pub payment_insert: InsertOutcome,
    /// The stored payment.
    ///
    /// Its tracking id is the one the parcel carries after the write, which
    /// differs from the proposed one when the parcel was already paid.
    pub payment: Payment,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Fetch the payment recorded for a gateway transaction.
    async fn find_by_transaction_id(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<Payment>, PaymentRepositoryError>;

    /// Mark the referenced parcel paid and insert `payment`, atomically.
    ///
    /// The parcel keeps an existing tracking id; otherwise it takes the one
    /// proposed on `payment`. A parcel that no longer exists is reported as an
    /// unmatched update and the payment is still recorded.
    async fn record_settlement(
        &self,
        payment: &Payment,
    ) -> Result<SettlementWrite, PaymentRepositoryError>;

    /// List payments, most recently paid first, optionally for one customer.
    async fn list(
        &self,
        customer: Option<EmailAddress>,
    ) -> Result<Vec<Payment>, PaymentRepositoryError>;
}
