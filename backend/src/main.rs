//! Backend entry-point: loads settings, prepares storage, and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use swift_parcel::inbound::http::health::HealthState;
use swift_parcel::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use swift_parcel::settings::{AppSettings, Storage};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|err| eyre!("failed to load settings: {err}"))?
        .resolve()
        .wrap_err("invalid settings")?;

    let mut config = ServerConfig::new(settings.clone());
    if let Storage::Postgres {
        database_url,
        pool_size,
    } = &settings.storage
    {
        run_pending_migrations(database_url)
            .await
            .wrap_err("database migration failed")?;
        let pool = DbPool::new(PoolConfig::new(database_url.clone()).with_max_size(*pool_size))
            .await
            .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start server")?;
    info!(bind_addr = %settings.bind_addr, "SwiftParcel server listening");
    server.await.wrap_err("server terminated abnormally")
}
