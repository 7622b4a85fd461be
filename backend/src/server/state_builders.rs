//! Builders for the HTTP state and the external adapters it depends on.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use swift_parcel::domain::SettlementConfig;
use swift_parcel::domain::ports::IdentityVerifier;
use swift_parcel::inbound::http::state::{HttpState, StateAdapters};
use swift_parcel::outbound::identity::{JwtIdentityVerifier, VerificationKey};
use swift_parcel::outbound::memory::InMemoryStore;
use swift_parcel::outbound::persistence::{
    DbPool, DieselParcelRepository, DieselPaymentRepository, DieselRiderRepository,
    DieselUserRepository,
};
use swift_parcel::outbound::stripe::{StripeCheckoutGateway, StripeGatewayConfig};
use swift_parcel::settings::{IdentityKeySource, RuntimeSettings};

/// Failures while assembling adapters at startup.
#[derive(Debug, thiserror::Error)]
pub enum StateBuildError {
    #[error("failed to read identity key {path}: {source}")]
    KeyFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Key(#[from] swift_parcel::outbound::identity::VerificationKeyError),
    #[error(transparent)]
    Gateway(#[from] swift_parcel::domain::ports::PaymentGatewayError),
}

fn build_verifier(
    settings: &RuntimeSettings,
) -> Result<Arc<dyn IdentityVerifier>, StateBuildError> {
    let key = match &settings.identity_key {
        IdentityKeySource::PublicKeyPem(path) => {
            let pem = std::fs::read(path).map_err(|source| StateBuildError::KeyFile {
                path: path.display().to_string(),
                source,
            })?;
            VerificationKey::RsaPem(pem)
        }
        IdentityKeySource::SharedSecret(secret) => {
            VerificationKey::SharedSecret(secret.as_bytes().to_vec())
        }
    };
    Ok(Arc::new(JwtIdentityVerifier::new(
        &settings.identity_project_id,
        key,
    )?))
}

fn build_gateway(settings: &RuntimeSettings) -> Result<Arc<StripeCheckoutGateway>, StateBuildError> {
    Ok(Arc::new(StripeCheckoutGateway::new(StripeGatewayConfig {
        secret_key: settings.stripe_secret.clone(),
        api_base: settings.stripe_api_base.clone(),
        site_domain: settings.site_domain.clone(),
        currency: settings.currency.clone(),
        timeout: settings.gateway_timeout,
    })?))
}

/// Compose the services behind the HTTP handlers.
///
/// Repositories are Diesel-backed when a pool is supplied and share a single
/// [`InMemoryStore`] otherwise.
///
/// # Errors
///
/// Returns [`StateBuildError`] when the identity key or the gateway client
/// cannot be prepared.
pub fn build_http_state(
    settings: &RuntimeSettings,
    pool: Option<&DbPool>,
) -> Result<HttpState, StateBuildError> {
    let verifier = build_verifier(settings)?;
    let gateway = build_gateway(settings)?;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let settlement = SettlementConfig {
        gateway_timeout: settings.gateway_timeout,
        currency: settings.currency.clone(),
    };

    let state = match pool {
        Some(pool) => HttpState::from(StateAdapters {
            parcels: Arc::new(DieselParcelRepository::new(pool.clone())),
            payments: Arc::new(DieselPaymentRepository::new(pool.clone())),
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            riders: Arc::new(DieselRiderRepository::new(pool.clone())),
            gateway,
            verifier,
            clock,
            settlement,
        }),
        None => {
            info!("records are kept in process memory");
            let store = Arc::new(InMemoryStore::new());
            HttpState::from(StateAdapters {
                parcels: Arc::clone(&store),
                payments: Arc::clone(&store),
                users: Arc::clone(&store),
                riders: store,
                gateway,
                verifier,
                clock,
                settlement,
            })
        }
    };
    Ok(state)
}
