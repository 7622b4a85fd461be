//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and depend only on the
//! driving ports, so they stay testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    IdentityVerifier, ParcelRepository, ParcelService, PaymentGateway, PaymentHistoryQuery,
    PaymentRepository, PaymentSettlement, RiderApplications, RiderRepository, UserRegistration,
    UserRepository,
};
use crate::domain::{
    AccessGuard, ParcelIntakeService, PaymentHistoryService, RegistrationService,
    RiderReviewService, SettlementConfig, SettlementService,
};

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub parcels: Arc<dyn ParcelService>,
    pub registration: Arc<dyn UserRegistration>,
    pub settlement: Arc<dyn PaymentSettlement>,
    pub payment_history: Arc<dyn PaymentHistoryQuery>,
    pub riders: Arc<dyn RiderApplications>,
    pub access_guard: AccessGuard,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub parcels: Arc<dyn ParcelService>,
    pub registration: Arc<dyn UserRegistration>,
    pub settlement: Arc<dyn PaymentSettlement>,
    pub payment_history: Arc<dyn PaymentHistoryQuery>,
    pub riders: Arc<dyn RiderApplications>,
    pub access_guard: AccessGuard,
}

impl HttpState {
    /// Construct state from the port bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            parcels,
            registration,
            settlement,
            payment_history,
            riders,
            access_guard,
        } = ports;
        Self {
            parcels,
            registration,
            settlement,
            payment_history,
            riders,
            access_guard,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

/// Driven adapters from which the domain services are composed.
///
/// The same composition serves the Postgres deployment, `in_memory` runs,
/// and tests; only the adapter types differ.
pub struct StateAdapters<P, Y, U, R, G> {
    pub parcels: Arc<P>,
    pub payments: Arc<Y>,
    pub users: Arc<U>,
    pub riders: Arc<R>,
    pub gateway: Arc<G>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub clock: Arc<dyn Clock>,
    pub settlement: SettlementConfig,
}

impl<P, Y, U, R, G> From<StateAdapters<P, Y, U, R, G>> for HttpStatePorts
where
    P: ParcelRepository + 'static,
    Y: PaymentRepository + 'static,
    U: UserRepository + 'static,
    R: RiderRepository + 'static,
    G: PaymentGateway + 'static,
{
    fn from(adapters: StateAdapters<P, Y, U, R, G>) -> Self {
        let StateAdapters {
            parcels,
            payments,
            users,
            riders,
            gateway,
            verifier,
            clock,
            settlement,
        } = adapters;
        Self {
            parcels: Arc::new(ParcelIntakeService::new(parcels, Arc::clone(&clock))),
            registration: Arc::new(RegistrationService::new(users, Arc::clone(&clock))),
            settlement: Arc::new(SettlementService::new(
                gateway,
                Arc::clone(&payments),
                Arc::clone(&clock),
                settlement,
            )),
            payment_history: Arc::new(PaymentHistoryService::new(payments)),
            riders: Arc::new(RiderReviewService::new(riders, clock)),
            access_guard: AccessGuard::new(verifier),
        }
    }
}

impl<P, Y, U, R, G> From<StateAdapters<P, Y, U, R, G>> for HttpState
where
    P: ParcelRepository + 'static,
    Y: PaymentRepository + 'static,
    U: UserRepository + 'static,
    R: RiderRepository + 'static,
    G: PaymentGateway + 'static,
{
    fn from(adapters: StateAdapters<P, Y, U, R, G>) -> Self {
        Self::new(HttpStatePorts::from(adapters))
    }
}
