//! Diesel table definitions.
//!
//! Must mirror `backend/migrations`; regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    /// Registered accounts, unique by email.
    users (id) {
        id -> Uuid,
        email -> Text,
        /// One of `user`, `rider`, `admin`.
        role -> Text,
        created_at -> Timestamptz,
        /// Client-supplied fields kept verbatim.
        details -> Jsonb,
    }
}

diesel::table! {
    /// Shipment requests.
    parcels (id) {
        id -> Uuid,
        sender_email -> Text,
        /// Shipping cost in minor currency units.
        cost_minor -> Int8,
        /// `unpaid` or `paid`.
        payment_status -> Text,
        /// Set exactly when `payment_status` is `paid`.
        tracking_id -> Nullable<Text>,
        created_at -> Timestamptz,
        details -> Jsonb,
    }
}

diesel::table! {
    /// Settled checkout sessions, unique by gateway transaction.
    payments (id) {
        id -> Uuid,
        transaction_id -> Text,
        amount_minor -> Int8,
        currency -> Text,
        customer_email -> Nullable<Text>,
        /// Not a foreign key: payments outlive deleted parcels.
        parcel_id -> Uuid,
        parcel_name -> Nullable<Text>,
        payment_status -> Text,
        paid_at -> Timestamptz,
        tracking_id -> Text,
    }
}

diesel::table! {
    /// Rider applications.
    riders (id) {
        id -> Uuid,
        email -> Text,
        /// One of `pending`, `approved`, `rejected`.
        status -> Text,
        created_at -> Timestamptz,
        details -> Jsonb,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, parcels, payments, riders);
