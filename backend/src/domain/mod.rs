//! Domain primitives, aggregates, and use-case services.
//!
//! Purpose: define the strongly typed records (parcels, payments, users,
//! rider applications) and the services implementing the driving ports. Keep
//! transport and storage concerns out; adapters live under `inbound` and
//! `outbound`.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Parcel, Payment, User, Rider: stored records.
//! - TrackingIdGenerator: mints `SWIFT-YYYYMMDD-XXXXXX` identifiers.
//! - SettlementService: reconciles checkout sessions exactly once.
//! - RiderReviewService: records review decisions and promotes riders.
//! - AccessGuard: verifies bearer credentials and ownership.

pub mod access_guard;
pub mod auth;
pub mod checkout;
pub mod email;
pub mod error;
pub mod ids;
pub mod money;
pub mod outcome;
pub mod parcel;
pub mod parcel_intake_service;
pub mod passthrough;
pub mod payment;
pub mod payment_history_service;
pub mod ports;
pub mod registration_service;
pub mod rider;
pub mod rider_review_service;
pub mod settlement_service;
pub mod trace_id;
pub mod tracking_id;
pub mod user;

pub use self::access_guard::{AccessGuard, FORBIDDEN_MESSAGE, UNAUTHORIZED_MESSAGE};
pub use self::auth::{BearerCredential, CredentialValidationError, VerifiedIdentity};
pub use self::checkout::{
    CheckoutRequest, CheckoutSession, GatewayPaymentStatus, GatewaySession, SessionMetadata,
    SessionReference, SessionReferenceValidationError,
};
pub use self::email::{EmailAddress, EmailValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{ParcelId, PaymentId, RecordIdValidationError, RiderId, UserId};
pub use self::money::{AmountValidationError, MinorUnits};
pub use self::outcome::{DeleteOutcome, InsertOutcome, UpdateOutcome};
pub use self::parcel::{
    PARCEL_RESERVED_FIELDS, Parcel, ParcelDraft, ParcelValidationError, PaymentStatus,
};
pub use self::parcel_intake_service::ParcelIntakeService;
pub use self::passthrough::PassthroughFields;
pub use self::payment::{Payment, TransactionId, TransactionIdValidationError};
pub use self::payment_history_service::PaymentHistoryService;
pub use self::registration_service::RegistrationService;
pub use self::rider::{
    RIDER_RESERVED_FIELDS, Rider, RiderDraft, RiderStatus, UnknownRiderStatus,
};
pub use self::rider_review_service::RiderReviewService;
pub use self::settlement_service::{SettlementConfig, SettlementService};
pub use self::trace_id::TraceId;
pub use self::tracking_id::{
    TRACKING_ID_PREFIX, TrackingId, TrackingIdGenerator, TrackingIdValidationError,
};
pub use self::user::{USER_RESERVED_FIELDS, UnknownUserRole, User, UserDraft, UserRole};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use swift_parcel::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("forbidden access"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
