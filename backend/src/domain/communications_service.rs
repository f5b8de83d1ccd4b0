//! Framework communications use-case.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::communications::{COMMUNICATION_FIELDS, newest, validate_communications};
use crate::domain::ports::{
    CommunicationsCommand, CommunicationsOverview, DataApi, DocumentStore, DocumentStoreError,
};
use crate::domain::{Error, Flash, Framework, UploadSet};

/// Domain service implementing [`CommunicationsCommand`] over one bucket.
#[derive(Clone)]
pub struct CommunicationsService {
    data_api: Arc<dyn DataApi>,
    store: Arc<dyn DocumentStore>,
    bucket: String,
}

impl CommunicationsService {
    pub fn new(data_api: Arc<dyn DataApi>, store: Arc<dyn DocumentStore>, bucket: String) -> Self {
        Self {
            data_api,
            store,
            bucket,
        }
    }

    async fn framework(&self, slug: &str) -> Result<Framework, Error> {
        self.data_api
            .get_framework(slug)
            .await
            .map_err(|error| {
                warn!(%error, slug, "framework lookup failed");
                Error::service_unavailable(format!("data API unavailable: {error}"))
            })?
            .ok_or_else(|| Error::not_found(format!("framework {slug} not found")))
    }
}

#[async_trait]
impl CommunicationsCommand for CommunicationsService {
    async fn overview(&self, framework_slug: &str) -> Result<CommunicationsOverview, Error> {
        let framework = self.framework(framework_slug).await?;
        let mut latest = Vec::with_capacity(COMMUNICATION_FIELDS.len());
        for field in COMMUNICATION_FIELDS {
            let objects = self
                .store
                .list(&self.bucket, &field.prefix(framework_slug))
                .await
                .map_err(map_store_error)?;
            latest.push(newest(objects));
        }
        let mut latest = latest.into_iter();
        Ok(CommunicationsOverview {
            framework,
            communication: latest.next().flatten(),
            clarification: latest.next().flatten(),
        })
    }

    async fn upload(&self, framework_slug: &str, uploads: &UploadSet) -> Result<Vec<Flash>, Error> {
        self.framework(framework_slug).await?;
        let outcome = validate_communications(framework_slug, uploads);
        let mut flashes = Vec::with_capacity(outcome.staged.len() + outcome.errors.len());
        for staged in &outcome.staged {
            self.store
                .save(
                    &self.bucket,
                    &staged.path,
                    &staged.bytes,
                    &staged.download_filename,
                )
                .await
                .map_err(map_store_error)?;
            info!(framework = framework_slug, path = %staged.path, "communication uploaded");
            flashes.push(Flash::uploaded(staged.field));
        }
        for (field, kind) in &outcome.errors {
            info!(framework = framework_slug, field, code = kind.code(), "communication refused");
            flashes.push(Flash::rejected(field, *kind));
        }
        Ok(flashes)
    }
}

fn map_store_error(error: DocumentStoreError) -> Error {
    Error::internal(format!("communications storage failed: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::communications::UPLOADED_CATEGORY;
    use crate::domain::ports::{MockDataApi, MockDocumentStore, StoredObject};
    use crate::domain::{DocumentErrorKind, ErrorCode, FrameworkStatus, Upload};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn framework() -> Framework {
        Framework {
            id: 12,
            slug: "g-cloud-12".to_owned(),
            name: "G-Cloud 12".to_owned(),
            status: FrameworkStatus::Open,
            framework_agreement_version: None,
        }
    }

    fn known_framework() -> MockDataApi {
        let mut api = MockDataApi::new();
        api.expect_get_framework()
            .returning(|_| Ok(Some(framework())));
        api
    }

    #[rstest]
    #[tokio::test]
    async fn overview_shows_newest_file_per_folder() {
        let mut api = MockDataApi::new();
        api.expect_get_framework()
            .returning(|_| Ok(Some(framework())));
        let mut store = MockDocumentStore::new();
        store.expect_list().returning(|bucket, prefix| {
            assert_eq!(bucket, "communications");
            let at = |h| Utc.with_ymd_and_hms(2024, 1, 1, h, 0, 0).single().expect("time");
            Ok(if prefix.ends_with("/communications") {
                vec![
                    StoredObject::new(format!("{prefix}/old.odt"), at(8)),
                    StoredObject::new(format!("{prefix}/new.odt"), at(9)),
                ]
            } else {
                Vec::new()
            })
        });
        let service =
            CommunicationsService::new(Arc::new(api), Arc::new(store), "communications".into());

        let overview = service.overview("g-cloud-12").await.expect("overview");
        assert_eq!(
            overview.communication.map(|o| o.path),
            Some("g-cloud-12/communications/updates/communications/new.odt".to_owned())
        );
        assert!(overview.clarification.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn overview_of_missing_framework_is_not_found() {
        let mut api = MockDataApi::new();
        api.expect_get_framework().returning(|_| Ok(None));
        let service = CommunicationsService::new(
            Arc::new(api),
            Arc::new(MockDocumentStore::new()),
            "communications".into(),
        );
        let error = service.overview("nope").await.expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn upload_saves_valid_files_and_flashes_every_outcome() {
        let mut store = MockDocumentStore::new();
        store
            .expect_save()
            .withf(|_, path, _, download| {
                path == "g-cloud-12/communications/updates/clarifications/answers.pdf"
                    && download == "answers.pdf"
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));
        let service = CommunicationsService::new(
            Arc::new(known_framework()),
            Arc::new(store),
            "communications".into(),
        );
        let uploads = UploadSet::new(vec![
            Upload::new("communication", "letter.docx", b"x".to_vec()),
            Upload::new("clarification", "answers.pdf", b"y".to_vec()),
        ]);

        let flashes = service.upload("g-cloud-12", &uploads).await.expect("upload");

        assert_eq!(
            flashes,
            vec![
                Flash::uploaded("clarification"),
                Flash::rejected("communication", DocumentErrorKind::NotOpenDocumentFormatOrCsv),
            ]
        );
        assert_eq!(flashes[0].category, UPLOADED_CATEGORY);
    }

    #[rstest]
    #[tokio::test]
    async fn upload_to_missing_framework_saves_nothing() {
        let mut api = MockDataApi::new();
        api.expect_get_framework().returning(|_| Ok(None));
        let mut store = MockDocumentStore::new();
        store.expect_save().never();
        let service =
            CommunicationsService::new(Arc::new(api), Arc::new(store), "communications".into());
        let uploads = UploadSet::new(vec![Upload::new("communication", "a.odt", b"x".to_vec())]);

        let error = service
            .upload("no-such-framework", &uploads)
            .await
            .expect_err("missing framework");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
