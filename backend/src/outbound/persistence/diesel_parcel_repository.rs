//! PostgreSQL-backed `ParcelRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ParcelRepository, ParcelRepositoryError};
use crate::domain::{
    DeleteOutcome, EmailAddress, InsertOutcome, MinorUnits, Parcel, ParcelDraft, ParcelId,
    PassthroughFields, PaymentStatus, TrackingId,
};

use super::diesel_error_mapping::map_basic_diesel_error;
use super::models::{NewParcelRow, ParcelRow};
use super::pool::{DbPool, PoolError};
use super::schema::parcels;

/// Diesel implementation of [`ParcelRepository`].
#[derive(Clone)]
pub struct DieselParcelRepository {
    pool: DbPool,
}

impl DieselParcelRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ParcelRepositoryError {
    ParcelRepositoryError::connection(error.message())
}

fn map_diesel_error(error: diesel::result::Error) -> ParcelRepositoryError {
    map_basic_diesel_error(
        &error,
        ParcelRepositoryError::query,
        ParcelRepositoryError::connection,
    )
}

/// Rebuild a domain parcel, rejecting rows that break its invariants.
pub(super) fn row_to_parcel(row: ParcelRow) -> Result<Parcel, ParcelRepositoryError> {
    let corrupt = |field: &str, err: &dyn std::fmt::Display| {
        ParcelRepositoryError::query(format!("parcel {} has invalid {field}: {err}", row.id))
    };
    let sender_email =
        EmailAddress::new(&row.sender_email).map_err(|err| corrupt("sender_email", &err))?;
    let cost = MinorUnits::new(row.cost_minor).map_err(|err| corrupt("cost", &err))?;
    let payment_status = PaymentStatus::parse(&row.payment_status)
        .ok_or_else(|| corrupt("payment_status", &row.payment_status))?;
    let tracking_id = row
        .tracking_id
        .clone()
        .map(TrackingId::parse)
        .transpose()
        .map_err(|err| corrupt("tracking_id", &err))?;
    let draft = ParcelDraft {
        sender_email,
        cost,
        details: PassthroughFields::from_stored(row.details.clone()),
    };
    Parcel::restore(
        ParcelId::from_uuid(row.id),
        draft,
        payment_status,
        tracking_id,
        row.created_at,
    )
    .map_err(|err| corrupt("payment state", &err))
}

#[async_trait]
impl ParcelRepository for DieselParcelRepository {
    async fn insert(&self, parcel: &Parcel) -> Result<InsertOutcome, ParcelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewParcelRow {
            id: *parcel.id().as_uuid(),
            sender_email: parcel.sender_email().as_ref(),
            cost_minor: parcel.cost().get(),
            payment_status: parcel.payment_status().as_str(),
            tracking_id: parcel.tracking_id().map(AsRef::as_ref),
            created_at: parcel.created_at(),
            details: parcel.details().clone().into_value(),
        };
        diesel::insert_into(parcels::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(InsertOutcome::new(parcel.id()))
    }

    async fn find_by_id(&self, id: &ParcelId) -> Result<Option<Parcel>, ParcelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = parcels::table
            .filter(parcels::id.eq(id.as_uuid()))
            .select(ParcelRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_parcel).transpose()
    }

    async fn list(
        &self,
        sender: Option<EmailAddress>,
    ) -> Result<Vec<Parcel>, ParcelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = parcels::table
            .select(ParcelRow::as_select())
            .order_by((parcels::created_at.desc(), parcels::id))
            .into_boxed();
        if let Some(sender) = sender {
            query = query.filter(parcels::sender_email.eq(sender.to_string()));
        }
        let rows: Vec<ParcelRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_parcel).collect()
    }

    async fn delete(&self, id: &ParcelId) -> Result<DeleteOutcome, ParcelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(parcels::table.filter(parcels::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(DeleteOutcome {
            deleted_count: deleted as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::json;
    use uuid::Uuid;

    fn row(payment_status: &str, tracking_id: Option<&str>) -> ParcelRow {
        ParcelRow {
            id: Uuid::nil(),
            sender_email: "a@x.com".to_owned(),
            cost_minor: 1050,
            payment_status: payment_status.to_owned(),
            tracking_id: tracking_id.map(str::to_owned),
            created_at: Utc
                .with_ymd_and_hms(2025, 3, 7, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
            details: json!({"parcelName": "Books"}),
        }
    }

    #[rstest]
    fn paid_rows_restore_with_their_tracking_id() {
        let parcel = row_to_parcel(row("paid", Some("SWIFT-20250307-0A1B2C"))).expect("valid row");
        assert_eq!(parcel.payment_status(), PaymentStatus::Paid);
        assert_eq!(
            parcel.tracking_id().map(AsRef::as_ref),
            Some("SWIFT-20250307-0A1B2C")
        );
        assert_eq!(parcel.details().get("parcelName"), Some(&json!("Books")));
    }

    #[rstest]
    #[case("paid", None)]
    #[case("unpaid", Some("SWIFT-20250307-0A1B2C"))]
    #[case("refunded", None)]
    #[case("paid", Some("not-a-tracking-id"))]
    fn inconsistent_rows_are_query_errors(
        #[case] status: &str,
        #[case] tracking_id: Option<&str>,
    ) {
        let err = row_to_parcel(row(status, tracking_id)).expect_err("corrupt row");
        assert!(matches!(err, ParcelRepositoryError::Query { .. }));
    }
}
