//! Process settings loaded via OrthoConfig.
//!
//! Values come from `SWIFT_PARCEL_*` environment variables, CLI flags, or a
//! config file. [`AppSettings::resolve`] checks required values and parses
//! them into [`RuntimeSettings`]; startup aborts when it fails.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::outbound::stripe::DEFAULT_STRIPE_API_BASE;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_CURRENCY: &str = "EUR";
const DEFAULT_GATEWAY_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_DB_POOL_SIZE: u32 = 10;

/// Raw configuration values.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SWIFT_PARCEL")]
pub struct AppSettings {
    /// Listen address.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string; unused with `in_memory`.
    pub database_url: Option<String>,
    /// Maximum pooled PostgreSQL connections.
    pub db_pool_size: Option<u32>,
    /// Stripe secret API key.
    pub stripe_secret: Option<String>,
    pub stripe_api_base: Option<String>,
    /// Public site the customer returns to after checkout.
    pub site_domain: Option<String>,
    pub currency: Option<String>,
    pub gateway_timeout_ms: Option<u64>,
    /// Identity-provider project; the expected token audience.
    pub identity_project_id: Option<String>,
    /// PEM public key for RS256 ID tokens.
    pub identity_key_path: Option<PathBuf>,
    /// HS256 secret, for local runs without the provider's keys.
    pub identity_shared_secret: Option<String>,
    /// Keep all records in process memory instead of PostgreSQL.
    #[ortho_config(default = false)]
    pub in_memory: bool,
}

/// Configuration errors reported at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required setting: {field}")]
    Missing { field: &'static str },
    #[error("invalid setting {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Where records are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    Postgres {
        database_url: String,
        pool_size: u32,
    },
    InMemory,
}

/// Key material for ID-token verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityKeySource {
    PublicKeyPem(PathBuf),
    SharedSecret(Zeroizing<String>),
}

/// Validated settings the server is built from.
#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    pub bind_addr: SocketAddr,
    pub storage: Storage,
    pub stripe_secret: Zeroizing<String>,
    pub stripe_api_base: Url,
    pub site_domain: Url,
    pub currency: String,
    pub gateway_timeout: Duration,
    pub identity_project_id: String,
    pub identity_key: IdentityKeySource,
}

fn required(value: Option<&str>, field: &'static str) -> Result<String, SettingsError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
        .ok_or(SettingsError::Missing { field })
}

fn parse_url(raw: &str, field: &'static str) -> Result<Url, SettingsError> {
    Url::parse(raw).map_err(|err| SettingsError::Invalid {
        field,
        message: err.to_string(),
    })
}

impl AppSettings {
    /// Check required values and parse addresses, URLs and durations.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Missing`] names the first absent required value;
    /// [`SettingsError::Invalid`] reports one that does not parse.
    pub fn resolve(&self) -> Result<RuntimeSettings, SettingsError> {
        let bind_addr = self
            .bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::Invalid {
                field: "bind_addr",
                message: err.to_string(),
            })?;

        let storage = if self.in_memory {
            Storage::InMemory
        } else {
            let pool_size = self.db_pool_size.unwrap_or(DEFAULT_DB_POOL_SIZE);
            if pool_size == 0 {
                return Err(SettingsError::Invalid {
                    field: "db_pool_size",
                    message: "must be greater than zero".to_owned(),
                });
            }
            Storage::Postgres {
                database_url: required(self.database_url.as_deref(), "database_url")?,
                pool_size,
            }
        };

        let stripe_secret = Zeroizing::new(required(self.stripe_secret.as_deref(), "stripe_secret")?);
        let stripe_api_base = parse_url(
            self.stripe_api_base
                .as_deref()
                .unwrap_or(DEFAULT_STRIPE_API_BASE),
            "stripe_api_base",
        )?;
        let site_domain = parse_url(
            &required(self.site_domain.as_deref(), "site_domain")?,
            "site_domain",
        )?;

        let currency = self
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CURRENCY);
        if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(SettingsError::Invalid {
                field: "currency",
                message: format!("{currency} is not a three-letter currency code"),
            });
        }

        let timeout_ms = self.gateway_timeout_ms.unwrap_or(DEFAULT_GATEWAY_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(SettingsError::Invalid {
                field: "gateway_timeout_ms",
                message: "must be greater than zero".to_owned(),
            });
        }

        let identity_project_id =
            required(self.identity_project_id.as_deref(), "identity_project_id")?;
        let identity_key = match (&self.identity_key_path, &self.identity_shared_secret) {
            (_, Some(secret)) if !secret.trim().is_empty() => {
                IdentityKeySource::SharedSecret(Zeroizing::new(secret.clone()))
            }
            (Some(path), _) => IdentityKeySource::PublicKeyPem(path.clone()),
            _ => {
                return Err(SettingsError::Missing {
                    field: "identity_key_path",
                });
            }
        };

        Ok(RuntimeSettings {
            bind_addr,
            storage,
            stripe_secret,
            stripe_api_base,
            site_domain,
            currency: currency.to_uppercase(),
            gateway_timeout: Duration::from_millis(timeout_ms),
            identity_project_id,
            identity_key,
        })
    }
}
