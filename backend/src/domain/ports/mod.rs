//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`DataApi`, `DocumentStore`) are implemented by outbound
//! adapters. Driving ports (`LoginService`, `ServiceDocumentsCommand`,
//! `CommunicationsCommand`) are implemented by domain services and called by
//! HTTP handlers.

mod macros;
pub(crate) use macros::define_port_error;

mod communications_command;
mod data_api;
mod document_store;
mod login_service;
mod service_documents_command;

#[cfg(test)]
pub use communications_command::MockCommunicationsCommand;
pub use communications_command::{CommunicationsCommand, CommunicationsOverview};
#[cfg(test)]
pub use data_api::MockDataApi;
pub use data_api::{DataApi, DataApiError};
#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{DocumentStore, DocumentStoreError, StoredObject};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use service_documents_command::MockServiceDocumentsCommand;
pub use service_documents_command::{
    ReplaceDocumentsOutcome, ReplaceDocumentsRequest, ServiceDocumentsCommand,
};
