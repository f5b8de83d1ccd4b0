//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use marketplace_admin::inbound::http::health::{HealthState, status};
use marketplace_admin::inbound::http::session_config::SessionSettings;
use marketplace_admin::inbound::http::session_config::fingerprint::key_fingerprint;
use marketplace_admin::inbound::http::state::HttpState;
use marketplace_admin::inbound::http::{MAX_UPLOAD_BYTES, configure};
use marketplace_admin::middleware::{StripTrailingSlash, Trace};

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: SessionSettings,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        session,
    } = deps;

    let admin = web::scope("")
        .wrap(session.middleware())
        .configure(configure);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
        .wrap(StripTrailingSlash)
        .wrap(Trace)
        .service(status)
        .service(admin)
}

/// Construct the HTTP server for the admin frontend.
///
/// # Errors
/// Propagates [`std::io::Error`] when the adapters cannot be built or the
/// socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        session,
        settings,
        bind_addr,
    } = config;
    let http_state = build_http_state(&settings)?;
    info!(
        key_fingerprint = %key_fingerprint(&session.key),
        cookie_secure = session.cookie_secure,
        "session key loaded"
    );

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            session: session.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "admin frontend listening");
    health_state.mark_ready();
    Ok(server)
}
