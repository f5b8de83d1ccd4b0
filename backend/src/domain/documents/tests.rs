//! Coverage for document validation and staging.

use super::*;
use chrono::TimeZone;
use rstest::{fixture, rstest};
use serde_json::json;

const ASSETS: &str = "https://assets.test.digitalmarketplace.service.gov.uk";

#[fixture]
fn service_id() -> ServiceId {
    ServiceId::new("1")
}

fn context(service_id: &ServiceId) -> StagingContext<'_> {
    StagingContext {
        assets_url: ASSETS,
        supplier_id: 2,
        service_id,
        uploaded_at: Utc
            .with_ymd_and_hms(2015, 1, 1, 12, 0, 0)
            .single()
            .expect("fixed time"),
    }
}

fn service(fields: Value) -> Service {
    let mut raw = json!({"id": 1, "supplierId": 2});
    if let (Some(target), Some(extra)) = (raw.as_object_mut(), fields.as_object()) {
        target.extend(extra.clone());
    }
    serde_json::from_value(raw).expect("service")
}

fn pdf(field: &str) -> Upload {
    Upload::new(field, "test.pdf", b"doc".to_vec())
}

fn blank(field: &str) -> Upload {
    Upload::new(field, "", Vec::new())
}

#[rstest]
fn registry_order_is_fixed() {
    let names: Vec<_> = SERVICE_DOCUMENT_FIELDS.iter().map(|f| f.name).collect();
    assert_eq!(
        names,
        [
            "serviceDefinitionDocumentURL",
            "termsAndConditionsDocumentURL",
            "pricingDocumentURL",
            "sfiaRateDocumentURL",
        ]
    );
    assert!(
        SERVICE_DOCUMENT_FIELDS
            .iter()
            .all(|f| f.format == FileFormat::Pdf)
    );
}

#[rstest]
fn valid_uploads_are_staged_with_constructed_urls(service_id: ServiceId) {
    let existing = service(json!({
        "pricingDocumentURL": "http://assets/documents/1/2-pricing.pdf",
        "serviceDefinitionDocumentURL": "http://assets/documents/1/2-service-definition.pdf",
        "termsAndConditionsDocumentURL": "http://assets/documents/1/2-terms-and-conditions.pdf",
        "sfiaRateDocumentURL": null,
    }));
    let uploads = UploadSet::new(vec![
        blank("serviceDefinitionDocumentURL"),
        pdf("pricingDocumentURL"),
        pdf("sfiaRateDocumentURL"),
        blank("termsAndConditionsDocumentURL"),
    ]);

    let outcome = validate_and_stage(&existing, &uploads, &context(&service_id));

    assert!(!outcome.has_errors());
    let expected: ServicePatch = serde_json::from_value(json!({
        "pricingDocumentURL": format!("{ASSETS}/documents/2/1-pricing-document-2015-01-01-1200.pdf"),
        "sfiaRateDocumentURL": format!("{ASSETS}/documents/2/1-sfia-rate-card-2015-01-01-1200.pdf"),
    }))
    .expect("patch");
    assert_eq!(outcome.patch(), expected);
    let paths: Vec<_> = outcome.staged.iter().map(|doc| doc.path.as_str()).collect();
    assert_eq!(
        paths,
        [
            "2/1-pricing-document-2015-01-01-1200.pdf",
            "2/1-sfia-rate-card-2015-01-01-1200.pdf",
        ]
    );
    assert!(
        outcome
            .staged
            .iter()
            .all(|doc| doc.download_filename == "test.pdf")
    );
}

#[rstest]
fn wrong_format_and_missing_required_answer_are_reported(service_id: ServiceId) {
    let existing = service(json!({
        "serviceDefinitionDocumentURL": "http://assets/documents/1/2-service-definition.pdf",
        "pricingDocumentURL": "http://assets/documents/1/2-pricing.pdf",
        "sfiaRateDocumentURL": null,
    }));
    let uploads = UploadSet::new(vec![
        blank("serviceDefinitionDocumentURL"),
        pdf("pricingDocumentURL"),
        Upload::new("sfiaRateDocumentURL", "test.txt", b"doc".to_vec()),
        Upload::new("termsAndConditionsDocumentURL", "test.pdf", Vec::new()),
    ]);

    let outcome = validate_and_stage(&existing, &uploads, &context(&service_id));

    let patch = outcome.patch();
    assert_eq!(patch.len(), 1);
    assert!(patch.contains_key("pricingDocumentURL"));
    assert_eq!(
        outcome.errors.get("sfiaRateDocumentURL"),
        Some(&DocumentErrorKind::NotPdf)
    );
    assert_eq!(
        outcome.errors.get("termsAndConditionsDocumentURL"),
        Some(&DocumentErrorKind::AnswerRequired)
    );
}

#[rstest]
#[case("serviceDefinitionDocumentURL", None, Some(DocumentErrorKind::AnswerRequired))]
#[case("serviceDefinitionDocumentURL", Some("http://x/doc.pdf"), None)]
#[case("pricingDocumentURL", None, None)]
#[case("sfiaRateDocumentURL", None, None)]
fn empty_body_with_filename_depends_on_requirement(
    service_id: ServiceId,
    #[case] field: &str,
    #[case] current: Option<&str>,
    #[case] expected: Option<DocumentErrorKind>,
) {
    let mut existing = HashMap::new();
    if let Some(url) = current {
        existing.insert(field.to_owned(), url.to_owned());
    }
    let uploads = UploadSet::new(vec![Upload::new(field, "test.pdf", Vec::new())]);

    let outcome = validate_and_stage(&existing, &uploads, &context(&service_id));

    assert!(outcome.staged.is_empty());
    assert_eq!(outcome.errors.get(field).copied(), expected);
}

#[rstest]
fn all_blank_submission_stages_nothing(service_id: ServiceId) {
    let uploads: UploadSet = SERVICE_DOCUMENT_FIELDS
        .iter()
        .map(|field| blank(field.name))
        .collect();
    let outcome = validate_and_stage(&HashMap::new(), &uploads, &context(&service_id));
    assert_eq!(outcome, DocumentOutcome::default());
    assert!(outcome.patch().is_empty());
}

#[rstest]
fn absent_fields_are_never_required(service_id: ServiceId) {
    let outcome = validate_and_stage(&HashMap::new(), &UploadSet::default(), &context(&service_id));
    assert!(!outcome.has_errors());
}

#[rstest]
#[case(vec![blank("pricingDocumentURL"), pdf("pricingDocumentURL")])]
#[case(vec![pdf("pricingDocumentURL"), blank("pricingDocumentURL")])]
fn duplicate_parts_stage_only_the_named_file(service_id: ServiceId, #[case] parts: Vec<Upload>) {
    let outcome = validate_and_stage(
        &HashMap::new(),
        &UploadSet::new(parts),
        &context(&service_id),
    );
    assert_eq!(outcome.staged.len(), 1);
    assert_eq!(outcome.staged[0].field, "pricingDocumentURL");
    assert!(!outcome.has_errors());
}

#[rstest]
fn extension_check_ignores_case(service_id: ServiceId) {
    let uploads = UploadSet::new(vec![Upload::new(
        "pricingDocumentURL",
        "Price List.PDF",
        b"doc".to_vec(),
    )]);
    let outcome = validate_and_stage(&HashMap::new(), &uploads, &context(&service_id));
    assert_eq!(
        outcome.staged[0].url,
        format!("{ASSETS}/documents/2/1-pricing-document-2015-01-01-1200.pdf")
    );
    assert_eq!(outcome.staged[0].download_filename, "Price List.PDF");
}

#[rstest]
#[case(DocumentErrorKind::NotPdf, "not_pdf", "Your document is not in an open format")]
#[case(
    DocumentErrorKind::NotOpenDocumentFormatOrCsv,
    "not_open_document_format_or_csv",
    "Your document is not in an open document format or CSV"
)]
#[case(
    DocumentErrorKind::AnswerRequired,
    "answer_required",
    "This question requires an answer"
)]
fn error_kinds_have_fixed_codes_and_messages(
    #[case] kind: DocumentErrorKind,
    #[case] code: &str,
    #[case] message: &str,
) {
    assert_eq!(kind.code(), code);
    assert_eq!(kind.message(), message);
    assert_eq!(
        serde_json::to_value(kind).expect("json"),
        Value::String(code.to_owned())
    );
}
