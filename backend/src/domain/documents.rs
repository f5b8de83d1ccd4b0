//! Service document validation and staging.
//!
//! Every document field is described once in [`SERVICE_DOCUMENT_FIELDS`] and
//! the validator walks that registry uniformly. Validation is pure: it turns
//! the current document URLs and the submitted files into staged documents
//! and per-field errors, leaving storage and the data API to the caller.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::{FileFormat, Service, ServiceId, ServicePatch, Upload, UploadSet};

/// Why a submitted file was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentErrorKind {
    NotPdf,
    NotOpenDocumentFormatOrCsv,
    AnswerRequired,
}

impl DocumentErrorKind {
    /// Stable code used in rendered pages.
    pub fn code(self) -> &'static str {
        match self {
            Self::NotPdf => "not_pdf",
            Self::NotOpenDocumentFormatOrCsv => "not_open_document_format_or_csv",
            Self::AnswerRequired => "answer_required",
        }
    }

    /// Message shown next to the field.
    pub fn message(self) -> &'static str {
        match self {
            Self::NotPdf => "Your document is not in an open format",
            Self::NotOpenDocumentFormatOrCsv => {
                "Your document is not in an open document format or CSV"
            }
            Self::AnswerRequired => "This question requires an answer",
        }
    }

    /// The error raised when a file does not match `format`.
    pub fn wrong_format(format: FileFormat) -> Self {
        match format {
            FileFormat::Pdf => Self::NotPdf,
            FileFormat::OpenDocumentOrCsv => Self::NotOpenDocumentFormatOrCsv,
        }
    }
}

/// Description of one document field on a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentField {
    /// Service attribute holding the document URL.
    pub name: &'static str,
    pub format: FileFormat,
    /// Required fields must hold a document once the form is submitted.
    pub required: bool,
    /// Token used in stored file names.
    pub slug: &'static str,
}

/// Document fields in the order they are validated and saved.
pub const SERVICE_DOCUMENT_FIELDS: &[DocumentField] = &[
    DocumentField {
        name: "serviceDefinitionDocumentURL",
        format: FileFormat::Pdf,
        required: true,
        slug: "service-definition-document",
    },
    DocumentField {
        name: "termsAndConditionsDocumentURL",
        format: FileFormat::Pdf,
        required: true,
        slug: "terms-and-conditions",
    },
    DocumentField {
        name: "pricingDocumentURL",
        format: FileFormat::Pdf,
        required: false,
        slug: "pricing-document",
    },
    DocumentField {
        name: "sfiaRateDocumentURL",
        format: FileFormat::Pdf,
        required: false,
        slug: "sfia-rate-card",
    },
];

/// Read access to the document URLs a service already has.
pub trait ExistingDocuments {
    fn document_url(&self, field: &str) -> Option<&str>;
}

impl ExistingDocuments for Service {
    fn document_url(&self, field: &str) -> Option<&str> {
        Service::document_url(self, field)
    }
}

impl ExistingDocuments for HashMap<String, String> {
    fn document_url(&self, field: &str) -> Option<&str> {
        self.get(field).map(String::as_str).filter(|url| !url.is_empty())
    }
}

/// Inputs needed to name staged files.
#[derive(Debug, Clone, Copy)]
pub struct StagingContext<'a> {
    /// Public base URL of the assets host, without a trailing slash.
    pub assets_url: &'a str,
    pub supplier_id: u64,
    pub service_id: &'a ServiceId,
    /// Timestamp embedded in file names.
    pub uploaded_at: DateTime<Utc>,
}

impl StagingContext<'_> {
    fn object_path(&self, field: &DocumentField, extension: &str) -> String {
        format!(
            "{}/{}-{}-{}.{}",
            self.supplier_id,
            self.service_id,
            field.slug,
            self.uploaded_at.format("%Y-%m-%d-%H%M"),
            extension
        )
    }
}

/// A file accepted for a field, ready to be written to the documents bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedDocument {
    pub field: &'static str,
    /// Object path inside the documents bucket.
    pub path: String,
    /// Public URL recorded on the service.
    pub url: String,
    pub download_filename: String,
    pub bytes: Vec<u8>,
}

/// Result of validating one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentOutcome {
    /// Accepted files in registry order.
    pub staged: Vec<StagedDocument>,
    pub errors: BTreeMap<&'static str, DocumentErrorKind>,
}

impl DocumentOutcome {
    /// Field updates for the data API.
    pub fn patch(&self) -> ServicePatch {
        self.staged
            .iter()
            .map(|doc| (doc.field.to_owned(), Value::String(doc.url.clone())))
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

enum FieldVerdict<'u> {
    Skip,
    Accept(&'u Upload, String),
    Reject(DocumentErrorKind),
}

fn judge<'u>(
    field: &DocumentField,
    upload: Option<&'u Upload>,
    existing: Option<&str>,
) -> FieldVerdict<'u> {
    let Some(upload) = upload.filter(|upload| !upload.is_blank()) else {
        return FieldVerdict::Skip;
    };
    if !upload.has_content() {
        return if field.required && existing.is_none() {
            FieldVerdict::Reject(DocumentErrorKind::AnswerRequired)
        } else {
            FieldVerdict::Skip
        };
    }
    match upload.extension() {
        Some(ext) if field.format.accepts(upload) => FieldVerdict::Accept(upload, ext),
        _ => FieldVerdict::Reject(DocumentErrorKind::wrong_format(field.format)),
    }
}

/// Validate `uploads` against the document registry and stage accepted files.
///
/// Fields that are absent or blank are skipped. A filename with no body is an
/// `answer_required` error only for a required field with no current
/// document. A file with the wrong extension is a format error and leaves the
/// current URL untouched.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use marketplace_admin::domain::{
///     validate_and_stage, DocumentErrorKind, ServiceId, StagingContext, Upload, UploadSet,
/// };
/// use std::collections::HashMap;
///
/// let service_id = ServiceId::new("1");
/// let context = StagingContext {
///     assets_url: "https://assets.example",
///     supplier_id: 2,
///     service_id: &service_id,
///     uploaded_at: Utc.with_ymd_and_hms(2015, 1, 1, 12, 0, 0).unwrap(),
/// };
/// let uploads = UploadSet::new(vec![
///     Upload::new("pricingDocumentURL", "test.pdf", b"doc".to_vec()),
///     Upload::new("sfiaRateDocumentURL", "test.txt", b"doc".to_vec()),
/// ]);
///
/// let outcome = validate_and_stage(&HashMap::new(), &uploads, &context);
/// assert_eq!(
///     outcome.patch()["pricingDocumentURL"],
///     "https://assets.example/documents/2/1-pricing-document-2015-01-01-1200.pdf"
/// );
/// assert_eq!(outcome.errors["sfiaRateDocumentURL"], DocumentErrorKind::NotPdf);
/// ```
pub fn validate_and_stage<E: ExistingDocuments + ?Sized>(
    existing: &E,
    uploads: &UploadSet,
    context: &StagingContext<'_>,
) -> DocumentOutcome {
    let mut outcome = DocumentOutcome::default();
    for field in SERVICE_DOCUMENT_FIELDS {
        match judge(field, uploads.get(field.name), existing.document_url(field.name)) {
            FieldVerdict::Skip => {}
            FieldVerdict::Reject(kind) => {
                outcome.errors.insert(field.name, kind);
            }
            FieldVerdict::Accept(upload, extension) => {
                let path = context.object_path(field, &extension);
                let url = format!(
                    "{}/documents/{}",
                    context.assets_url.trim_end_matches('/'),
                    path
                );
                outcome.staged.push(StagedDocument {
                    field: field.name,
                    path,
                    url,
                    download_filename: upload.basename().to_owned(),
                    bytes: upload.bytes.clone(),
                });
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests;
