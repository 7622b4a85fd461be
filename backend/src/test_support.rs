//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled when running tests or
//! when the `test-support` feature is enabled.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use mockable::Clock;
use url::Url;

use crate::domain::ports::{
    IdentityVerificationError, IdentityVerifier, PaymentGateway, PaymentGatewayError,
};
use crate::domain::{
    BearerCredential, CheckoutRequest, CheckoutSession, EmailAddress, GatewayPaymentStatus,
    GatewaySession, SessionMetadata, SessionReference, SettlementConfig, TransactionId,
    VerifiedIdentity,
};
use crate::inbound::http::state::{HttpState, StateAdapters};
use crate::outbound::memory::InMemoryStore;

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    utc_now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(utc_now: DateTime<Utc>) -> Self {
        Self { utc_now }
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Identity verifier accepting a fixed set of tokens.
#[derive(Debug, Default)]
pub struct StaticIdentityVerifier {
    tokens: HashMap<String, EmailAddress>,
}

impl StaticIdentityVerifier {
    /// Accept `token` as proof of `email`.
    #[must_use]
    pub fn with_token(mut self, token: &str, email: &str) -> Self {
        if let Ok(email) = EmailAddress::new(email) {
            self.tokens.insert(token.to_owned(), email);
        }
        self
    }
}

#[async_trait]
impl IdentityVerifier for StaticIdentityVerifier {
    async fn verify(
        &self,
        credential: &BearerCredential,
    ) -> Result<VerifiedIdentity, IdentityVerificationError> {
        self.tokens
            .get(credential.token())
            .cloned()
            .map(VerifiedIdentity::new)
            .ok_or_else(|| IdentityVerificationError::rejected("unknown token"))
    }
}

/// In-process stand-in for the hosted checkout gateway.
///
/// Sessions start unpaid; tests complete them with [`ScriptedGateway::pay`]
/// to simulate the customer finishing checkout.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    sessions: Mutex<HashMap<String, GatewaySession>>,
}

impl ScriptedGateway {
    fn with_sessions<T>(&self, f: impl FnOnce(&mut HashMap<String, GatewaySession>) -> T) -> T {
        let mut guard = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Mark a session paid under `transaction_id`; returns false if unknown.
    pub fn pay(&self, reference: &str, transaction_id: &str) -> bool {
        self.with_sessions(|sessions| match sessions.get_mut(reference) {
            Some(session) => {
                session.payment_status = GatewayPaymentStatus::Paid;
                session.transaction_id = TransactionId::new(transaction_id).ok();
                true
            }
            None => false,
        })
    }

    /// Attach a payment reference without completing payment.
    pub fn start_payment(&self, reference: &str, transaction_id: &str) -> bool {
        self.with_sessions(|sessions| match sessions.get_mut(reference) {
            Some(session) => {
                session.transaction_id = TransactionId::new(transaction_id).ok();
                true
            }
            None => false,
        })
    }

    /// Number of sessions opened so far.
    pub fn session_count(&self) -> usize {
        self.with_sessions(|sessions| sessions.len())
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentGatewayError> {
        let raw_reference = format!("cs_test_{}", self.session_count() + 1);
        let reference = SessionReference::new(raw_reference.clone())
            .map_err(|err| PaymentGatewayError::invalid_request(err.to_string()))?;
        let url = Url::parse(&format!("https://checkout.test/pay/{raw_reference}"))
            .map_err(|err| PaymentGatewayError::decode(err.to_string()))?;
        let session = GatewaySession {
            reference: reference.clone(),
            transaction_id: None,
            payment_status: GatewayPaymentStatus::Unpaid,
            amount_total: Some(request.cost),
            currency: Some("eur".to_owned()),
            customer_email: Some(request.sender_email.clone()),
            metadata: SessionMetadata {
                parcel_id: Some(request.parcel_id.to_string()),
                parcel_name: Some(request.parcel_name.clone()),
            },
        };
        self.with_sessions(|sessions| sessions.insert(raw_reference, session));
        Ok(CheckoutSession { reference, url })
    }

    async fn retrieve_session(
        &self,
        reference: &SessionReference,
    ) -> Result<GatewaySession, PaymentGatewayError> {
        self.with_sessions(|sessions| sessions.get(reference.as_ref()).cloned())
            .ok_or_else(|| PaymentGatewayError::rejected(404_u16, "No such checkout.session"))
    }
}

/// HTTP state over one in-memory store, a scripted gateway and fixed tokens.
pub struct InMemoryHarness {
    pub store: Arc<InMemoryStore>,
    pub gateway: Arc<ScriptedGateway>,
    pub state: HttpState,
}

impl InMemoryHarness {
    /// Compose the services with the clock frozen at `now`.
    pub fn new(verifier: StaticIdentityVerifier, now: DateTime<Utc>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let gateway = Arc::new(ScriptedGateway::default());
        let state = HttpState::from(StateAdapters {
            parcels: Arc::clone(&store),
            payments: Arc::clone(&store),
            users: Arc::clone(&store),
            riders: Arc::clone(&store),
            gateway: Arc::clone(&gateway),
            verifier: Arc::new(verifier),
            clock: Arc::new(FixedClock::new(now)),
            settlement: SettlementConfig::default(),
        });
        Self {
            store,
            gateway,
            state,
        }
    }
}
