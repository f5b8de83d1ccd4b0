//! Admin frontend entry-point: loads settings, builds adapters and serves
//! the `/admin` pages.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use marketplace_admin::inbound::http::health::HealthState;
use marketplace_admin::inbound::http::session_config::{BuildMode, session_settings_from_env};
use marketplace_admin::settings::AdminSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AdminSettings::load().map_err(|error| std::io::Error::other(error.to_string()))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(session, settings))?;
    server.await
}
