//! HTTP server configuration object.

use std::net::SocketAddr;

use marketplace_admin::inbound::http::session_config::SessionSettings;
use marketplace_admin::settings::AdminSettings;

/// Everything needed to build and bind the server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) settings: AdminSettings,
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Bind to the address from `settings`.
    #[must_use]
    pub fn new(session: SessionSettings, settings: AdminSettings) -> Self {
        let bind_addr = settings.bind_addr();
        Self {
            session,
            settings,
            bind_addr,
        }
    }
}
