//! PostgreSQL-backed `PaymentRepository`.
//!
//! Settlement runs in one transaction: the parcel row is locked, marked paid
//! unless it already carries a tracking id, and the payment row is inserted.
//! The unique index on `payments.transaction_id` turns a concurrent second
//! settlement of the same transaction into a rollback.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{PaymentRepository, PaymentRepositoryError, SettlementWrite};
use crate::domain::{
    EmailAddress, GatewayPaymentStatus, InsertOutcome, MinorUnits, ParcelId, Payment, PaymentId,
    PaymentStatus, TrackingId, TransactionId, UpdateOutcome,
};

use super::diesel_error_mapping::{DieselFailure, classify};
use super::models::{NewPaymentRow, ParcelPaidUpdate, PaymentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{parcels, payments};

/// Diesel implementation of [`PaymentRepository`].
#[derive(Clone)]
pub struct DieselPaymentRepository {
    pool: DbPool,
}

impl DieselPaymentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PaymentRepositoryError {
    PaymentRepositoryError::connection(error.message())
}

fn map_diesel_error(error: diesel::result::Error) -> PaymentRepositoryError {
    match classify(&error) {
        DieselFailure::Connection(message) => PaymentRepositoryError::connection(message),
        DieselFailure::UniqueViolation => {
            PaymentRepositoryError::query("unique constraint violated")
        }
        DieselFailure::Query(message) => PaymentRepositoryError::query(message),
    }
}

fn row_to_payment(row: PaymentRow) -> Result<Payment, PaymentRepositoryError> {
    let id = row.id;
    let corrupt = |field: &str, err: &dyn std::fmt::Display| {
        PaymentRepositoryError::query(format!("payment {id} has invalid {field}: {err}"))
    };
    Ok(Payment {
        id: PaymentId::from_uuid(row.id),
        transaction_id: TransactionId::new(row.transaction_id)
            .map_err(|err| corrupt("transaction_id", &err))?,
        amount: MinorUnits::new(row.amount_minor).map_err(|err| corrupt("amount", &err))?,
        currency: row.currency,
        customer_email: row
            .customer_email
            .map(EmailAddress::new)
            .transpose()
            .map_err(|err| corrupt("customer_email", &err))?,
        parcel_id: ParcelId::from_uuid(row.parcel_id),
        parcel_name: row.parcel_name,
        payment_status: GatewayPaymentStatus::parse(&row.payment_status),
        paid_at: row.paid_at,
        tracking_id: TrackingId::parse(row.tracking_id)
            .map_err(|err| corrupt("tracking_id", &err))?,
    })
}

/// Outcome of the parcel half of a settlement.
struct ParcelSettlement {
    update: UpdateOutcome,
    /// Tracking id the parcel carries after the write, if it exists.
    tracking_id: Option<String>,
}

async fn settle_parcel(
    conn: &mut diesel_async::AsyncPgConnection,
    parcel_id: &ParcelId,
    proposed: &TrackingId,
) -> Result<ParcelSettlement, diesel::result::Error> {
    let current: Option<Option<String>> = parcels::table
        .filter(parcels::id.eq(parcel_id.as_uuid()))
        .select(parcels::tracking_id)
        .for_update()
        .first(conn)
        .await
        .optional()?;

    match current {
        None => Ok(ParcelSettlement {
            update: UpdateOutcome::UNMATCHED,
            tracking_id: None,
        }),
        Some(Some(existing)) => Ok(ParcelSettlement {
            update: UpdateOutcome::matched(false),
            tracking_id: Some(existing),
        }),
        Some(None) => {
            diesel::update(parcels::table.filter(parcels::id.eq(parcel_id.as_uuid())))
                .set(&ParcelPaidUpdate {
                    payment_status: PaymentStatus::Paid.as_str(),
                    tracking_id: proposed.as_ref(),
                })
                .execute(conn)
                .await?;
            Ok(ParcelSettlement {
                update: UpdateOutcome::matched(true),
                tracking_id: Some(proposed.to_string()),
            })
        }
    }
}

#[async_trait]
impl PaymentRepository for DieselPaymentRepository {
    async fn find_by_transaction_id(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<Payment>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = payments::table
            .filter(payments::transaction_id.eq(transaction_id.as_ref()))
            .select(PaymentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_payment).transpose()
    }

    async fn record_settlement(
        &self,
        payment: &Payment,
    ) -> Result<SettlementWrite, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let result = conn
            .transaction(|conn| {
                async move {
                    let parcel =
                        settle_parcel(conn, &payment.parcel_id, &payment.tracking_id).await?;
                    let tracking_id = parcel
                        .tracking_id
                        .unwrap_or_else(|| payment.tracking_id.to_string());
                    let row = NewPaymentRow {
                        id: *payment.id.as_uuid(),
                        transaction_id: payment.transaction_id.as_ref(),
                        amount_minor: payment.amount.get(),
                        currency: &payment.currency,
                        customer_email: payment.customer_email.as_ref().map(AsRef::as_ref),
                        parcel_id: *payment.parcel_id.as_uuid(),
                        parcel_name: payment.parcel_name.as_deref(),
                        payment_status: payment.payment_status.as_str(),
                        paid_at: payment.paid_at,
                        tracking_id: &tracking_id,
                    };
                    diesel::insert_into(payments::table)
                        .values(&row)
                        .execute(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>((parcel.update, tracking_id))
                }
                .scope_boxed()
            })
            .await;

        let (parcel_update, tracking_id) = match result {
            Ok(written) => written,
            Err(error) if classify(&error) == DieselFailure::UniqueViolation => {
                return Err(PaymentRepositoryError::duplicate_transaction(
                    payment.transaction_id.to_string(),
                ));
            }
            Err(error) => return Err(map_diesel_error(error)),
        };

        let tracking_id = TrackingId::parse(tracking_id)
            .map_err(|err| PaymentRepositoryError::query(format!("stored tracking id: {err}")))?;
        Ok(SettlementWrite {
            parcel_update,
            payment_insert: InsertOutcome::new(payment.id),
            payment: payment.clone().with_tracking_id(tracking_id),
        })
    }

    async fn list(
        &self,
        customer: Option<EmailAddress>,
    ) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = payments::table
            .select(PaymentRow::as_select())
            .order_by((payments::paid_at.desc(), payments::id))
            .into_boxed();
        if let Some(customer) = customer {
            query = query.filter(payments::customer_email.eq(customer.to_string()));
        }
        let rows: Vec<PaymentRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_payment).collect()
    }
}
