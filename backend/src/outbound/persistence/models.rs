//! Diesel row structs. Internal to the persistence adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use super::schema::{parcels, payments, riders, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub details: Value,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
    pub details: Value,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = parcels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ParcelRow {
    pub id: Uuid,
    pub sender_email: String,
    pub cost_minor: i64,
    pub payment_status: String,
    pub tracking_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub details: Value,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = parcels)]
pub(crate) struct NewParcelRow<'a> {
    pub id: Uuid,
    pub sender_email: &'a str,
    pub cost_minor: i64,
    pub payment_status: &'a str,
    pub tracking_id: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub details: Value,
}

/// Columns written when a parcel is settled.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = parcels)]
pub(crate) struct ParcelPaidUpdate<'a> {
    pub payment_status: &'a str,
    pub tracking_id: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PaymentRow {
    pub id: Uuid,
    pub transaction_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub customer_email: Option<String>,
    pub parcel_id: Uuid,
    pub parcel_name: Option<String>,
    pub payment_status: String,
    pub paid_at: DateTime<Utc>,
    pub tracking_id: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub(crate) struct NewPaymentRow<'a> {
    pub id: Uuid,
    pub transaction_id: &'a str,
    pub amount_minor: i64,
    pub currency: &'a str,
    pub customer_email: Option<&'a str>,
    pub parcel_id: Uuid,
    pub parcel_name: Option<&'a str>,
    pub payment_status: &'a str,
    pub paid_at: DateTime<Utc>,
    pub tracking_id: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = riders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RiderRow {
    pub id: Uuid,
    pub email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub details: Value,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = riders)]
pub(crate) struct NewRiderRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub details: Value,
}
