//! Builders wiring the outbound adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use marketplace_admin::domain::ports::{DataApi, DocumentStore};
use marketplace_admin::domain::{
    AdminLoginService, CommunicationsService, DocumentStorage, DocumentUpdateService,
};
use marketplace_admin::inbound::http::state::{HttpState, HttpStatePorts, ReportLinks};
use marketplace_admin::outbound::data_api::HttpDataApi;
use marketplace_admin::outbound::document_store::{LocalDocumentStore, UrlSigner};
use marketplace_admin::settings::AdminSettings;

/// Both driven adapters, shared by every domain service.
struct Adapters {
    data_api: Arc<dyn DataApi>,
    store: Arc<dyn DocumentStore>,
}

fn build_adapters(settings: &AdminSettings, clock: Arc<dyn Clock>) -> std::io::Result<Adapters> {
    let data_api_url = settings.data_api_url().map_err(std::io::Error::other)?;
    info!(url = %data_api_url, "using data API");
    let data_api = HttpDataApi::new(
        data_api_url,
        settings.data_api_auth_token(),
        settings.data_api_timeout(),
    )
    .map_err(|error| std::io::Error::other(format!("data API client: {error}")))?;

    let storage_root = settings.storage_root();
    info!(root = %storage_root.display(), "opening object store");
    let store = LocalDocumentStore::open(
        &storage_root,
        &settings.buckets(),
        UrlSigner::new(settings.url_signing_secret(), settings.signed_url_ttl()),
        clock,
    )?;

    Ok(Adapters {
        data_api: Arc::new(data_api),
        store: Arc::new(store),
    })
}

/// Ports for the handlers, built over the given adapters.
fn build_ports(
    settings: &AdminSettings,
    adapters: Adapters,
    clock: Arc<dyn Clock>,
) -> std::io::Result<HttpStatePorts> {
    let Adapters { data_api, store } = adapters;
    let assets_url = settings.assets_url().map_err(std::io::Error::other)?;
    Ok(HttpStatePorts {
        login: Arc::new(AdminLoginService::new(data_api.clone())),
        documents: Arc::new(DocumentUpdateService::new(
            data_api.clone(),
            store.clone(),
            clock,
            DocumentStorage {
                bucket: settings.documents_bucket().to_owned(),
                assets_url: assets_url.to_string(),
            },
        )),
        communications: Arc::new(CommunicationsService::new(
            data_api.clone(),
            store.clone(),
            settings.communications_bucket().to_owned(),
        )),
        data_api,
        store,
    })
}

fn report_links(settings: &AdminSettings) -> std::io::Result<ReportLinks> {
    Ok(ReportLinks {
        bucket: settings.reports_bucket().to_owned(),
        assets_url: settings.assets_url().map_err(std::io::Error::other)?,
    })
}

/// Build the shared HTTP state from the configured adapters.
///
/// # Errors
///
/// Fails when a configured URL is malformed, the HTTP client cannot be built
/// or a bucket directory cannot be opened.
pub(super) fn build_http_state(settings: &AdminSettings) -> std::io::Result<web::Data<HttpState>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let adapters = build_adapters(settings, clock.clone())?;
    let ports = build_ports(settings, adapters, clock)?;
    Ok(web::Data::new(HttpState::new(ports, report_links(settings)?)))
}
