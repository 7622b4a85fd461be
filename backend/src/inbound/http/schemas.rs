//! OpenAPI schema definitions for domain records and request bodies.
//!
//! Records carry free-form passthrough fields next to their typed ones, so
//! their serialised shape is not something utoipa can derive. These wrappers
//! describe the typed part; the extra keys appear as `additionalProperties`.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::Parcel`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Parcel, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ParcelSchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "ada@example.com")]
    sender_email: String,
    /// Shipping fee in major units.
    #[schema(example = 12.5)]
    cost: f64,
    #[schema(example = "unpaid")]
    payment_status: String,
    /// Present once the parcel has been paid for.
    #[schema(example = "SWIFT-20250307-A1B2C3")]
    tracking_id: Option<String>,
    #[schema(example = "2025-03-07T09:30:00Z")]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Payment`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Payment, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PaymentSchema {
    id: String,
    #[schema(example = "pi_3OqXYZ")]
    transaction_id: String,
    /// Gateway-reported total in major units.
    amount: f64,
    #[schema(example = "eur")]
    currency: String,
    customer_email: Option<String>,
    parcel_id: String,
    parcel_name: Option<String>,
    #[schema(example = "paid")]
    payment_status: String,
    paid_at: String,
    #[schema(example = "SWIFT-20250307-A1B2C3")]
    tracking_id: String,
}

/// OpenAPI schema for [`crate::domain::Rider`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Rider, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RiderSchema {
    id: String,
    email: String,
    #[schema(example = "pending")]
    status: String,
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::InsertOutcome`].
#[derive(ToSchema)]
#[schema(as = crate::domain::InsertOutcome, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct InsertOutcomeSchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    inserted_id: String,
}

/// OpenAPI schema for [`crate::domain::UpdateOutcome`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UpdateOutcome, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UpdateOutcomeSchema {
    matched_count: u64,
    modified_count: u64,
}

/// OpenAPI schema for [`crate::domain::DeleteOutcome`].
#[derive(ToSchema)]
#[schema(as = crate::domain::DeleteOutcome, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DeleteOutcomeSchema {
    deleted_count: u64,
}

/// OpenAPI schema for [`crate::domain::ports::RiderStatusOutcome`].
///
/// `userPromotion` is present only for approvals.
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::RiderStatusOutcome, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RiderStatusOutcomeSchema {
    matched_count: u64,
    modified_count: u64,
    user_promotion: Option<UpdateOutcomeSchema>,
}

/// Registration body; any other keys are stored with the user.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserRegistrationSchema {
    #[schema(example = "ada@example.com")]
    email: String,
}

/// Parcel submission; any other keys are stored with the parcel.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ParcelSubmissionSchema {
    #[schema(example = "ada@example.com")]
    sender_email: String,
    /// Major units, as a number or numeric string.
    #[schema(value_type = f64, example = 12.5)]
    cost: f64,
}

/// Rider application; any other keys are stored with the application.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RiderApplicationSchema {
    #[schema(example = "rider@example.com")]
    email: String,
}
