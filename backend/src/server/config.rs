//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use swift_parcel::outbound::persistence::DbPool;
use swift_parcel::settings::RuntimeSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) settings: RuntimeSettings,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration from resolved settings.
    #[must_use]
    pub fn new(settings: RuntimeSettings) -> Self {
        Self {
            bind_addr: settings.bind_addr,
            settings,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for the repository adapters.
    ///
    /// Without one the server keeps every record in process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
