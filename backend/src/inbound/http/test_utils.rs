//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::AccessGuard;
use crate::domain::ports::{
    MockParcelService, MockPaymentHistoryQuery, MockPaymentSettlement, MockRiderApplications,
    MockUserRegistration,
};
use crate::inbound::http::configure;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::middleware::Trace;
use crate::test_support::{InMemoryHarness, StaticIdentityVerifier};

/// Token accepted as proof of [`OWNER_EMAIL`].
pub const OWNER_TOKEN: &str = "owner-token";
pub const OWNER_EMAIL: &str = "ada@example.com";

/// Instant every test clock is frozen at.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 7, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// In-memory harness accepting [`OWNER_TOKEN`].
pub fn harness() -> InMemoryHarness {
    InMemoryHarness::new(
        StaticIdentityVerifier::default().with_token(OWNER_TOKEN, OWNER_EMAIL),
        test_now(),
    )
}

/// In-memory state authenticating through `verifier`.
pub fn state_with_verifier(verifier: StaticIdentityVerifier) -> HttpState {
    InMemoryHarness::new(verifier, test_now()).state
}

/// Mock driving ports, each failing the test if called without expectations.
#[derive(Default)]
pub struct MockPorts {
    pub parcels: MockParcelService,
    pub registration: MockUserRegistration,
    pub settlement: MockPaymentSettlement,
    pub payment_history: MockPaymentHistoryQuery,
    pub riders: MockRiderApplications,
}

impl MockPorts {
    /// Build state whose bearer tokens are checked by `verifier`.
    pub fn into_state(self, verifier: StaticIdentityVerifier) -> HttpState {
        HttpState::new(HttpStatePorts {
            parcels: Arc::new(self.parcels),
            registration: Arc::new(self.registration),
            settlement: Arc::new(self.settlement),
            payment_history: Arc::new(self.payment_history),
            riders: Arc::new(self.riders),
            access_guard: AccessGuard::new(Arc::new(verifier)),
        })
    }
}

/// The full route table over `state`, wrapped in the trace middleware.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .configure(configure)
}
