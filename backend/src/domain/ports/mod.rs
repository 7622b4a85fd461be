//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`ParcelService`, `UserRegistration`, `PaymentSettlement`,
//! `PaymentHistoryQuery`, `RiderApplications`) are what inbound adapters call.
//! Driven ports (the repositories, `PaymentGateway`, `IdentityVerifier`) are
//! what the domain calls out to.

mod macros;
pub(crate) use macros::define_port_error;

mod identity_verifier;
mod parcel_repository;
mod parcel_service;
mod payment_gateway;
mod payment_history_query;
mod payment_repository;
mod payment_settlement;
mod rider_applications;
mod rider_repository;
mod user_registration;
mod user_repository;

#[cfg(test)]
pub use identity_verifier::MockIdentityVerifier;
pub use identity_verifier::{IdentityVerificationError, IdentityVerifier};
#[cfg(test)]
pub use parcel_repository::MockParcelRepository;
pub use parcel_repository::{ParcelRepository, ParcelRepositoryError};
#[cfg(test)]
pub use parcel_service::MockParcelService;
pub use parcel_service::ParcelService;
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{PaymentGateway, PaymentGatewayError};
#[cfg(test)]
pub use payment_history_query::MockPaymentHistoryQuery;
pub use payment_history_query::PaymentHistoryQuery;
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
pub use payment_repository::{PaymentRepository, PaymentRepositoryError, SettlementWrite};
#[cfg(test)]
pub use payment_settlement::MockPaymentSettlement;
pub use payment_settlement::{
    PaymentSettlement, ReconciliationResult, SettlementReceipt, UnsettledReason,
};
#[cfg(test)]
pub use rider_applications::MockRiderApplications;
pub use rider_applications::{RiderApplications, RiderStatusOutcome, RiderStatusUpdate};
#[cfg(test)]
pub use rider_repository::MockRiderRepository;
pub use rider_repository::{
    RiderRepository, RiderRepositoryError, RiderStatusChange, RiderStatusWrite,
};
#[cfg(test)]
pub use user_registration::MockUserRegistration;
pub use user_registration::{RegistrationOutcome, UserRegistration};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
