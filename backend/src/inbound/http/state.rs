//! Shared HTTP adapter state.
//!
//! Handlers accept this via `web::Data<HttpState>`, so they only depend on
//! ports and stay testable with mocks or in-memory doubles.

use std::sync::Arc;

use url::Url;

use crate::domain::ports::{
    CommunicationsCommand, DataApi, DocumentStore, LoginService, ServiceDocumentsCommand,
};

/// Parameter object bundling the port implementations handlers call.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub documents: Arc<dyn ServiceDocumentsCommand>,
    pub communications: Arc<dyn CommunicationsCommand>,
    pub data_api: Arc<dyn DataApi>,
    pub store: Arc<dyn DocumentStore>,
}

/// Where report downloads are stored and linked from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLinks {
    pub bucket: String,
    /// Base URL the signed links are rooted at.
    pub assets_url: Url,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub documents: Arc<dyn ServiceDocumentsCommand>,
    pub communications: Arc<dyn CommunicationsCommand>,
    pub data_api: Arc<dyn DataApi>,
    pub store: Arc<dyn DocumentStore>,
    pub reports: ReportLinks,
}

impl HttpState {
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use marketplace_admin::domain::{
    ///     AdminLoginService, CommunicationsService, DocumentStorage, DocumentUpdateService,
    /// };
    /// use marketplace_admin::inbound::http::state::{HttpState, HttpStatePorts, ReportLinks};
    /// use marketplace_admin::test_support::{InMemoryDataApi, InMemoryDocumentStore};
    /// use mockable::DefaultClock;
    /// use url::Url;
    ///
    /// let data_api = Arc::new(InMemoryDataApi::default());
    /// let store = Arc::new(InMemoryDocumentStore::default());
    /// let assets_url = Url::parse("http://assets.example.com").unwrap();
    /// let ports = HttpStatePorts {
    ///     login: Arc::new(AdminLoginService::new(data_api.clone())),
    ///     documents: Arc::new(DocumentUpdateService::new(
    ///         data_api.clone(),
    ///         store.clone(),
    ///         Arc::new(DefaultClock),
    ///         DocumentStorage {
    ///             bucket: "documents".into(),
    ///             assets_url: "http://assets.example.com".into(),
    ///         },
    ///     )),
    ///     communications: Arc::new(CommunicationsService::new(
    ///         data_api.clone(),
    ///         store.clone(),
    ///         "communications".into(),
    ///     )),
    ///     data_api,
    ///     store,
    /// };
    /// let state = HttpState::new(ports, ReportLinks { bucket: "reports".into(), assets_url });
    /// assert_eq!(state.reports.bucket, "reports");
    /// ```
    pub fn new(ports: HttpStatePorts, reports: ReportLinks) -> Self {
        let HttpStatePorts {
            login,
            documents,
            communications,
            data_api,
            store,
        } = ports;
        Self {
            login,
            documents,
            communications,
            data_api,
            store,
            reports,
        }
    }
}
