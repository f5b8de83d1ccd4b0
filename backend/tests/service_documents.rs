//! Replacing service documents end to end: the multipart form, validation,
//! files written to the documents bucket and the data API update.

mod support;

use std::sync::Arc;

use actix_web::http::StatusCode;
use cap_std::{ambient_authority, fs::Dir};
use marketplace_admin::test_support::{
    DOCUMENTS_BUCKET, InMemoryDataApi, MutableClock, TempDocumentStore, admin, http_state,
    service,
};
use rstest::{fixture, rstest};
use serde_json::json;
use support::{PASSWORD, admin_app, get, post_files, sign_in};

const EDIT_URI: &str = "/admin/service/1412/edit/documents";
const PRICING_PATH: &str = "2/1412-pricing-document-2020-06-01-1200.pdf";
const PRICING_URL: &str = "http://assets.example.com/documents/2/1412-pricing-document-2020-06-01-1200.pdf";
const DEFINITION_URL: &str = "http://assets.example.com/documents/2/1412-service-definition.pdf";

struct World {
    data_api: Arc<InMemoryDataApi>,
    documents: TempDocumentStore,
}

impl World {
    fn with(data_api: InMemoryDataApi) -> Self {
        let clock = Arc::new(MutableClock::at_fixture_time());
        Self {
            data_api: Arc::new(data_api),
            documents: TempDocumentStore::open(&[DOCUMENTS_BUCKET], clock),
        }
    }

    fn state(&self) -> marketplace_admin::inbound::http::state::HttpState {
        http_state(
            self.data_api.clone(),
            self.documents.store.clone(),
            Arc::new(MutableClock::at_fixture_time()),
        )
    }

    fn stored(&self, path: &str) -> Option<Vec<u8>> {
        let bucket = self.documents.root().join(DOCUMENTS_BUCKET);
        Dir::open_ambient_dir(bucket, ambient_authority())
            .and_then(|dir| dir.read(path))
            .ok()
    }
}

#[fixture]
fn data_api() -> InMemoryDataApi {
    InMemoryDataApi::default()
        .with_admin(admin(1, "admin"), PASSWORD)
        .with_admin(admin(2, "admin-framework-manager"), PASSWORD)
        .with_service(service(
            "1412",
            2,
            json!({
                "serviceName": "Cloud hosting",
                "serviceDefinitionDocumentURL": DEFINITION_URL,
                "termsAndConditionsDocumentURL": "http://assets.example.com/documents/2/1412-terms.pdf",
            }),
        ))
}

#[rstest]
#[actix_web::test]
async fn accepted_document_is_stored_and_linked(data_api: InMemoryDataApi) {
    let world = World::with(data_api);
    let app = admin_app(world.state()).await;
    let cookie = sign_in(&app, "admin@example.gov").await;

    let reply = post_files(
        &app,
        EDIT_URI,
        &cookie,
        &[
            ("serviceDefinitionDocumentURL", "", b""),
            ("pricingDocumentURL", "Prices 2020.pdf", b"%PDF-1.4 prices"),
        ],
    )
    .await;

    assert_eq!(reply.status, StatusCode::FOUND);
    assert_eq!(reply.location.as_deref(), Some("/admin/service/1412"));
    assert_eq!(world.stored(PRICING_PATH), Some(b"%PDF-1.4 prices".to_vec()));

    let meta = world
        .documents
        .store
        .metadata(DOCUMENTS_BUCKET, PRICING_PATH)
        .await
        .expect("metadata")
        .expect("sidecar written");
    assert_eq!(meta.download_filename, "Prices 2020.pdf");

    let updates = world.data_api.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].updated_by, "admin@example.gov");
    assert_eq!(updates[0].update_reason, "admin app");
    assert_eq!(
        updates[0].patch.keys().collect::<Vec<_>>(),
        ["pricingDocumentURL"]
    );

    let page = get(&app, "/admin/service/1412", &cookie).await.json();
    assert_eq!(page["service"]["pricingDocumentURL"], PRICING_URL);
    assert_eq!(page["service"]["serviceDefinitionDocumentURL"], DEFINITION_URL);
}

#[rstest]
#[actix_web::test]
async fn wrong_format_is_refused_while_other_fields_are_kept(data_api: InMemoryDataApi) {
    let world = World::with(data_api);
    let app = admin_app(world.state()).await;
    let cookie = sign_in(&app, "admin@example.gov").await;

    let reply = post_files(
        &app,
        EDIT_URI,
        &cookie,
        &[
            ("pricingDocumentURL", "prices.pdf", b"%PDF"),
            ("sfiaRateDocumentURL", "rates.docx", b"docx"),
        ],
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    let page = reply.json();
    assert_eq!(page["errors"]["sfiaRateDocumentURL"]["code"], "not_pdf");
    assert!(page["errors"].get("pricingDocumentURL").is_none());
    assert_eq!(page["service"]["pricingDocumentURL"], PRICING_URL);
    assert!(world.stored(PRICING_PATH).is_some());
    assert_eq!(world.data_api.updates().len(), 1);
}

#[rstest]
#[actix_web::test]
async fn data_api_refusal_is_shown_on_the_form(data_api: InMemoryDataApi) {
    let world = World::with(data_api.rejecting_updates(400, "API ERROR"));
    let app = admin_app(world.state()).await;
    let cookie = sign_in(&app, "admin@example.gov").await;

    let reply = post_files(
        &app,
        EDIT_URI,
        &cookie,
        &[("pricingDocumentURL", "prices.pdf", b"%PDF")],
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    let page = reply.json();
    assert_eq!(page["upstreamError"], "API ERROR");
    assert_eq!(page["errors"], json!({}));
    assert!(world.data_api.updates().is_empty());
}

#[rstest]
#[actix_web::test]
async fn nothing_submitted_changes_nothing(data_api: InMemoryDataApi) {
    let world = World::with(data_api);
    let app = admin_app(world.state()).await;
    let cookie = sign_in(&app, "admin@example.gov").await;

    let reply = post_files(&app, EDIT_URI, &cookie, &[("pricingDocumentURL", "", b"")]).await;

    assert_eq!(reply.status, StatusCode::FOUND);
    assert!(world.data_api.updates().is_empty());
}

#[rstest]
#[actix_web::test]
async fn framework_managers_may_view_but_not_edit(data_api: InMemoryDataApi) {
    let world = World::with(data_api);
    let app = admin_app(world.state()).await;
    let cookie = sign_in(&app, "admin-framework-manager@example.gov").await;

    assert_eq!(get(&app, "/admin/service/1412", &cookie).await.status, StatusCode::OK);
    assert_eq!(get(&app, EDIT_URI, &cookie).await.status, StatusCode::FORBIDDEN);
    let reply = post_files(
        &app,
        EDIT_URI,
        &cookie,
        &[("pricingDocumentURL", "prices.pdf", b"%PDF")],
    )
    .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert!(world.stored(PRICING_PATH).is_none());
}

#[rstest]
#[actix_web::test]
async fn unknown_service_is_not_found(data_api: InMemoryDataApi) {
    let world = World::with(data_api);
    let app = admin_app(world.state()).await;
    let cookie = sign_in(&app, "admin@example.gov").await;

    let reply = get(&app, "/admin/service/9999/edit/documents", &cookie).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[rstest]
#[case("/admin/service/1412", StatusCode::OK)]
#[case("/admin/service/1412/edit/documents", StatusCode::OK)]
#[case("/admin/services/1412", StatusCode::NOT_FOUND)]
#[case("/admin/services/1412/edit/documents", StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn service_pages_live_under_the_singular_path(
    data_api: InMemoryDataApi,
    #[case] uri: &str,
    #[case] expected: StatusCode,
) {
    let world = World::with(data_api);
    let app = admin_app(world.state()).await;
    let cookie = sign_in(&app, "admin@example.gov").await;

    assert_eq!(get(&app, uri, &cookie).await.status, expected);
}
