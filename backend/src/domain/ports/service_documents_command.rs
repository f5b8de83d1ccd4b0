//! Driving port for replacing a service's documents.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::{DocumentErrorKind, Error, Service, ServiceId, UploadSet};

/// Request to replace some of a service's documents.
#[derive(Debug, Clone)]
pub struct ReplaceDocumentsRequest {
    pub service_id: ServiceId,
    pub uploads: UploadSet,
    /// Email address of the signed-in staff member.
    pub actor_email: String,
}

/// What happened to a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplaceDocumentsOutcome {
    /// Every submitted field was accepted and the data API agreed.
    Updated { service_id: ServiceId },
    /// At least one field was refused or the data API rejected the update.
    Rejected {
        /// The service with accepted changes applied.
        service: Service,
        errors: BTreeMap<&'static str, DocumentErrorKind>,
        /// Upstream rejection content, verbatim.
        upstream_error: Option<String>,
    },
}

/// Port for the document edit use-case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceDocumentsCommand: Send + Sync {
    /// Validate, store, and record new documents for a service.
    ///
    /// Missing services are `not_found`; storage failures are internal
    /// errors.
    async fn replace_documents(
        &self,
        request: ReplaceDocumentsRequest,
    ) -> Result<ReplaceDocumentsOutcome, Error>;
}
