//! Service document replacement.
//!
//! Validation is delegated to [`validate_and_stage`]; this service adds the
//! side effects. Accepted files are written to the documents bucket in
//! registry order before the data API sees the patch. Files already written
//! stay in place if a later step fails.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    DataApi, DataApiError, DocumentStore, DocumentStoreError, ReplaceDocumentsOutcome,
    ReplaceDocumentsRequest, ServiceDocumentsCommand,
};
use crate::domain::{Error, StagingContext, validate_and_stage};

/// Audit label attached to every update made through this application.
pub const UPDATE_REASON: &str = "admin app";

/// Where staged documents are written and published.
#[derive(Debug, Clone)]
pub struct DocumentStorage {
    pub bucket: String,
    /// Public base URL of the assets host.
    pub assets_url: String,
}

/// Domain service implementing [`ServiceDocumentsCommand`].
#[derive(Clone)]
pub struct DocumentUpdateService {
    data_api: Arc<dyn DataApi>,
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    storage: DocumentStorage,
}

impl DocumentUpdateService {
    pub fn new(
        data_api: Arc<dyn DataApi>,
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        storage: DocumentStorage,
    ) -> Self {
        Self {
            data_api,
            store,
            clock,
            storage,
        }
    }
}

#[async_trait]
impl ServiceDocumentsCommand for DocumentUpdateService {
    async fn replace_documents(
        &self,
        request: ReplaceDocumentsRequest,
    ) -> Result<ReplaceDocumentsOutcome, Error> {
        let ReplaceDocumentsRequest {
            service_id,
            uploads,
            actor_email,
        } = request;

        let service = self
            .data_api
            .get_service(&service_id)
            .await
            .map_err(map_lookup_error)?
            .ok_or_else(|| Error::not_found(format!("service {service_id} not found")))?;

        let context = StagingContext {
            assets_url: &self.storage.assets_url,
            supplier_id: service.supplier_id,
            service_id: &service.id,
            uploaded_at: self.clock.utc(),
        };
        let outcome = validate_and_stage(&service, &uploads, &context);

        for staged in &outcome.staged {
            self.store
                .save(
                    &self.storage.bucket,
                    &staged.path,
                    &staged.bytes,
                    &staged.download_filename,
                )
                .await
                .map_err(map_store_error)?;
            info!(
                service_id = %service.id,
                field = staged.field,
                path = %staged.path,
                "service document saved"
            );
        }

        let patch = outcome.patch();
        let mut upstream_error = None;
        if !patch.is_empty() {
            match self
                .data_api
                .update_service(&service.id, &patch, &actor_email, UPDATE_REASON)
                .await
            {
                Ok(()) => {}
                Err(DataApiError::Rejected { status, content }) => {
                    warn!(service_id = %service.id, status, "data API rejected document update");
                    upstream_error = Some(content);
                }
                Err(error) => return Err(map_lookup_error(error)),
            }
        }

        if !outcome.has_errors() && upstream_error.is_none() {
            return Ok(ReplaceDocumentsOutcome::Updated { service_id });
        }

        if outcome.has_errors() {
            info!(
                service_id = %service.id,
                fields = ?outcome.errors.keys().collect::<Vec<_>>(),
                "document upload refused"
            );
        }
        Ok(ReplaceDocumentsOutcome::Rejected {
            service: service.with_patch(&patch),
            errors: outcome.errors,
            upstream_error,
        })
    }
}

fn map_lookup_error(error: DataApiError) -> Error {
    warn!(%error, "data API call failed");
    Error::service_unavailable(format!("data API unavailable: {error}"))
}

fn map_store_error(error: DocumentStoreError) -> Error {
    Error::internal(format!("failed to save document: {error}"))
}

#[cfg(test)]
#[path = "document_update_service_tests.rs"]
mod tests;
