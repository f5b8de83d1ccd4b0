//! Service pages and the document edit form.
//!
//! ```text
//! GET  /admin/service/1412
//! GET  /admin/service/1412/edit/documents
//! POST /admin/service/1412/edit/documents   (multipart/form-data)
//! ```

use std::collections::BTreeMap;

use actix_multipart::Multipart;
use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::ports::{ReplaceDocumentsOutcome, ReplaceDocumentsRequest};
use crate::domain::{
    DocumentErrorKind, Error, FileFormat, Gate, SERVICE_DOCUMENT_FIELDS, Service, ServiceId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::map_data_api_error;
use crate::inbound::http::login::redirect_to;
use crate::inbound::http::multipart::read_uploads;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

fn service_path(id: &ServiceId) -> String {
    format!("/admin/service/{id}")
}

async fn find_service(state: &HttpState, id: &ServiceId) -> ApiResult<Service> {
    state
        .data_api
        .get_service(id)
        .await
        .map_err(map_data_api_error)?
        .ok_or_else(|| Error::not_found(format!("service {id} not found")))
}

/// Read-only service page.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServicePage {
    pub title: String,
    pub edit_documents: String,
    pub service: Service,
}

#[get("/admin/service/{id}")]
pub async fn view_service(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_gate(Gate::ViewServices)?;
    let id = ServiceId::new(id.into_inner());
    let service = find_service(&state, &id).await?;
    Ok(HttpResponse::Ok().json(ServicePage {
        title: format!("Service {id}"),
        edit_documents: format!("{}/edit/documents", service_path(&id)),
        service,
    }))
}

/// One document input on the edit form.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInput {
    pub name: String,
    pub accepts: Vec<String>,
    pub required: bool,
    pub current_url: Option<String>,
}

/// A refused field as shown next to its input.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub code: String,
    pub message: String,
}

impl From<DocumentErrorKind> for FieldError {
    fn from(kind: DocumentErrorKind) -> Self {
        Self {
            code: kind.code().to_owned(),
            message: kind.message().to_owned(),
        }
    }
}

/// The document edit form.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditDocumentsPage {
    pub title: String,
    pub service: Service,
    pub documents: Vec<DocumentInput>,
    pub errors: BTreeMap<String, FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_error: Option<String>,
}

fn accepted_extensions(format: FileFormat) -> Vec<String> {
    format.extensions().iter().map(|ext| format!(".{ext}")).collect()
}

impl EditDocumentsPage {
    fn new(service: Service) -> Self {
        let documents = SERVICE_DOCUMENT_FIELDS
            .iter()
            .map(|field| DocumentInput {
                name: field.name.to_owned(),
                accepts: accepted_extensions(field.format),
                required: field.required,
                current_url: service.document_url(field.name).map(str::to_owned),
            })
            .collect();
        Self {
            title: "Edit documents".to_owned(),
            service,
            documents,
            errors: BTreeMap::new(),
            upstream_error: None,
        }
    }
}

#[get("/admin/service/{id}/edit/documents")]
pub async fn edit_documents_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_gate(Gate::EditServiceDocuments)?;
    let service = find_service(&state, &ServiceId::new(id.into_inner())).await?;
    Ok(HttpResponse::Ok().json(EditDocumentsPage::new(service)))
}

/// Replace documents from a multipart form.
///
/// Accepted files are stored even when another field is refused; the form is
/// then shown again with the refused fields marked.
#[post("/admin/service/{id}/edit/documents")]
pub async fn update_documents(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<String>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let user = session.require_gate(Gate::EditServiceDocuments)?;
    let uploads = read_uploads(payload).await?;
    let request = ReplaceDocumentsRequest {
        service_id: ServiceId::new(id.into_inner()),
        uploads,
        actor_email: user.email_address,
    };

    match state.documents.replace_documents(request).await? {
        ReplaceDocumentsOutcome::Updated { service_id } => {
            info!(%service_id, "service documents updated");
            Ok(redirect_to(&service_path(&service_id)))
        }
        ReplaceDocumentsOutcome::Rejected {
            service,
            errors,
            upstream_error,
        } => {
            let mut page = EditDocumentsPage::new(service);
            page.errors = errors
                .into_iter()
                .map(|(field, kind)| (field.to_owned(), FieldError::from(kind)))
                .collect();
            page.upstream_error = upstream_error;
            Ok(HttpResponse::Ok().json(page))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockDataApi, MockServiceDocumentsCommand};
    use crate::inbound::http::multipart::test_body::{content_type, encode};
    use crate::inbound::http::test_utils::{
        SIGN_IN_ROUTE, http_state_with, sign_in, sign_in_as, test_session_middleware,
    };
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Arc;

    fn service() -> Service {
        serde_json::from_value(json!({
            "id": "1412",
            "supplierId": 2,
            "serviceName": "Cloud hosting",
            "serviceDefinitionDocumentURL": "http://assets/documents/2/1412-service-definition-document.pdf",
            "pricingDocumentURL": "",
        }))
        .expect("service")
    }

    struct Reply {
        status: StatusCode,
        location: Option<String>,
        body: web::Bytes,
    }

    async fn call_as(role: &str, req: test::TestRequest, state: HttpState) -> Reply {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(test_session_middleware())
                .route(SIGN_IN_ROUTE, web::get().to(sign_in_as))
                .service(view_service)
                .service(edit_documents_page)
                .service(update_documents),
        )
        .await;
        let cookie = sign_in(&app, role).await;
        let res = test::call_service(&app, req.cookie(cookie).to_request()).await;
        let status = res.status();
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        Reply {
            status,
            location,
            body: test::read_body(res).await,
        }
    }

    fn api_with_service() -> MockDataApi {
        let mut api = MockDataApi::new();
        api.expect_get_service()
            .returning(|id| Ok((id.as_str() == "1412").then(service)));
        api
    }

    fn upload_request() -> test::TestRequest {
        test::TestRequest::post()
            .uri("/admin/service/1412/edit/documents")
            .insert_header((header::CONTENT_TYPE, content_type()))
            .set_payload(encode(&[("pricingDocumentURL", "pricing.pdf", b"%PDF-1.4")]))
    }

    #[rstest]
    #[actix_web::test]
    async fn service_page_shows_the_record() {
        let state = http_state_with(|ports| ports.data_api = Arc::new(api_with_service()));
        let reply = call_as(
            "admin-framework-manager",
            test::TestRequest::get().uri("/admin/service/1412"),
            state,
        )
        .await;

        assert_eq!(reply.status, StatusCode::OK);
        let page: ServicePage = serde_json::from_slice(&reply.body).expect("page");
        assert_eq!(page.service, service());
        assert_eq!(page.edit_documents, "/admin/service/1412/edit/documents");
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_service_is_not_found() {
        let state = http_state_with(|ports| ports.data_api = Arc::new(api_with_service()));
        let reply = call_as(
            "admin",
            test::TestRequest::get().uri("/admin/service/9999"),
            state,
        )
        .await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[actix_web::test]
    async fn edit_form_lists_document_fields_with_current_links() {
        let state = http_state_with(|ports| ports.data_api = Arc::new(api_with_service()));
        let reply = call_as(
            "admin-ccs-category",
            test::TestRequest::get().uri("/admin/service/1412/edit/documents"),
            state,
        )
        .await;

        assert_eq!(reply.status, StatusCode::OK);
        let page: EditDocumentsPage = serde_json::from_slice(&reply.body).expect("page");
        let names: Vec<_> = page.documents.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "serviceDefinitionDocumentURL",
                "termsAndConditionsDocumentURL",
                "pricingDocumentURL",
                "sfiaRateDocumentURL",
            ]
        );
        assert!(page.documents[0].current_url.is_some());
        assert_eq!(page.documents[2].current_url, None);
        assert_eq!(page.documents[2].accepts, [".pdf"]);
    }

    #[rstest]
    #[case("admin", StatusCode::OK)]
    #[case("admin-ccs-category", StatusCode::OK)]
    #[case("admin-framework-manager", StatusCode::FORBIDDEN)]
    #[case("admin-ccs-sourcing", StatusCode::FORBIDDEN)]
    #[actix_web::test]
    async fn edit_form_is_gated_by_role(#[case] role: &str, #[case] expected: StatusCode) {
        let state = http_state_with(|ports| ports.data_api = Arc::new(api_with_service()));
        let reply = call_as(
            role,
            test::TestRequest::get().uri("/admin/service/1412/edit/documents"),
            state,
        )
        .await;
        assert_eq!(reply.status, expected);
    }

    #[rstest]
    #[actix_web::test]
    async fn accepted_upload_redirects_to_the_service() {
        let mut documents = MockServiceDocumentsCommand::new();
        documents
            .expect_replace_documents()
            .withf(|request| {
                request.service_id.as_str() == "1412"
                    && request.actor_email == "test.admin@example.gov"
                    && request
                        .uploads
                        .get("pricingDocumentURL")
                        .is_some_and(|u| u.filename == "pricing.pdf")
            })
            .times(1)
            .returning(|request| {
                Ok(ReplaceDocumentsOutcome::Updated {
                    service_id: request.service_id,
                })
            });
        let state = http_state_with(|ports| ports.documents = Arc::new(documents));

        let reply = call_as("admin", upload_request(), state).await;

        assert_eq!(reply.status, StatusCode::FOUND);
        assert_eq!(reply.location.as_deref(), Some("/admin/service/1412"));
    }

    #[rstest]
    #[actix_web::test]
    async fn refused_upload_rerenders_with_errors_and_upstream_message() {
        let mut documents = MockServiceDocumentsCommand::new();
        documents.expect_replace_documents().returning(|_| {
            Ok(ReplaceDocumentsOutcome::Rejected {
                service: service(),
                errors: BTreeMap::from([("pricingDocumentURL", DocumentErrorKind::NotPdf)]),
                upstream_error: Some("API ERROR".to_owned()),
            })
        });
        let state = http_state_with(|ports| ports.documents = Arc::new(documents));

        let reply = call_as("admin", upload_request(), state).await;

        assert_eq!(reply.status, StatusCode::OK);
        let page: EditDocumentsPage = serde_json::from_slice(&reply.body).expect("page");
        assert_eq!(
            page.errors.get("pricingDocumentURL"),
            Some(&FieldError {
                code: "not_pdf".to_owned(),
                message: "Your document is not in an open format".to_owned(),
            })
        );
        assert_eq!(page.upstream_error.as_deref(), Some("API ERROR"));
    }

    #[rstest]
    #[actix_web::test]
    async fn upload_is_refused_before_reading_for_the_wrong_role() {
        let mut documents = MockServiceDocumentsCommand::new();
        documents.expect_replace_documents().never();
        let state = http_state_with(|ports| ports.documents = Arc::new(documents));

        let reply = call_as("admin-manager", upload_request(), state).await;
        assert_eq!(reply.status, StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[actix_web::test]
    async fn command_not_found_is_a_404() {
        let mut documents = MockServiceDocumentsCommand::new();
        documents
            .expect_replace_documents()
            .returning(|request| {
                Err(Error::not_found(format!(
                    "service {} not found",
                    request.service_id
                )))
            });
        let state = http_state_with(|ports| ports.documents = Arc::new(documents));

        let reply = call_as("admin", upload_request(), state).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }
}
