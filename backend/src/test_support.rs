//! Test doubles shared by unit tests, integration tests and doctests.
//!
//! Compiled only with the `test-support` feature. Nothing here talks to the
//! network; the temporary document store touches only its own directory.

mod clock;
mod data_api;
mod document_store;
mod fixtures;

use std::sync::Arc;

use url::Url;

pub use clock::MutableClock;
pub use data_api::{InMemoryDataApi, RecordedUpdate};
pub use document_store::{InMemoryDocumentStore, SavedObject, TempDocumentStore};
pub use fixtures::{admin, buyer, framework, service, supplier_user};

use crate::domain::ports::{DataApi, DocumentStore};
use crate::domain::{
    AdminLoginService, CommunicationsService, DocumentStorage, DocumentUpdateService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts, ReportLinks};

/// Base URL documents and reports are linked from in tests.
pub const ASSETS_URL: &str = "http://assets.example.com/";
pub const DOCUMENTS_BUCKET: &str = "documents";
pub const COMMUNICATIONS_BUCKET: &str = "communications";
pub const REPORTS_BUCKET: &str = "reports";

/// Real domain services over the given adapters.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use marketplace_admin::test_support::{
///     InMemoryDataApi, InMemoryDocumentStore, MutableClock, http_state,
/// };
///
/// let state = http_state(
///     Arc::new(InMemoryDataApi::default()),
///     Arc::new(InMemoryDocumentStore::default()),
///     Arc::new(MutableClock::at_fixture_time()),
/// );
/// assert_eq!(state.reports.bucket, "reports");
/// ```
pub fn http_state(
    data_api: Arc<dyn DataApi>,
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn mockable::Clock>,
) -> HttpState {
    let assets_url = match Url::parse(ASSETS_URL) {
        Ok(url) => url,
        Err(error) => panic!("static assets URL: {error}"),
    };
    let ports = HttpStatePorts {
        login: Arc::new(AdminLoginService::new(data_api.clone())),
        documents: Arc::new(DocumentUpdateService::new(
            data_api.clone(),
            store.clone(),
            clock,
            DocumentStorage {
                bucket: DOCUMENTS_BUCKET.to_owned(),
                assets_url: ASSETS_URL.to_owned(),
            },
        )),
        communications: Arc::new(CommunicationsService::new(
            data_api.clone(),
            store.clone(),
            COMMUNICATIONS_BUCKET.to_owned(),
        )),
        data_api,
        store,
    };
    HttpState::new(
        ports,
        ReportLinks {
            bucket: REPORTS_BUCKET.to_owned(),
            assets_url,
        },
    )
}

/// HTTP state over empty in-memory adapters.
pub fn http_state_with_in_memory() -> HttpState {
    http_state(
        Arc::new(InMemoryDataApi::default()),
        Arc::new(InMemoryDocumentStore::default()),
        Arc::new(MutableClock::at_fixture_time()),
    )
}
