//! Framework communications and clarification answers.
//!
//! Files live in the communications bucket under
//! `<framework>/communications/updates/<folder>/<filename>`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ports::StoredObject;
use super::{DocumentErrorKind, FileFormat, UploadSet};

/// Flash category recorded for a successful upload.
pub const UPLOADED_CATEGORY: &str = "upload_communication";

/// Upload fields on the communications page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommunicationField {
    pub name: &'static str,
    pub format: FileFormat,
    /// Folder below `updates/`.
    pub folder: &'static str,
}

pub const COMMUNICATION_FIELDS: &[CommunicationField] = &[
    CommunicationField {
        name: "communication",
        format: FileFormat::OpenDocumentOrCsv,
        folder: "communications",
    },
    CommunicationField {
        name: "clarification",
        format: FileFormat::Pdf,
        folder: "clarifications",
    },
];

impl CommunicationField {
    /// Listing prefix for the folder of `framework_slug`.
    pub fn prefix(&self, framework_slug: &str) -> String {
        format!("{framework_slug}/communications/updates/{}", self.folder)
    }

    pub fn object_path(&self, framework_slug: &str, filename: &str) -> String {
        format!("{}/{filename}", self.prefix(framework_slug))
    }
}

/// A one-shot message shown after the redirect that follows an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: String,
    pub field: String,
    pub message: String,
}

impl Flash {
    pub fn uploaded(field: &str) -> Self {
        Self {
            category: UPLOADED_CATEGORY.to_owned(),
            field: field.to_owned(),
            message: format!("New {field} was uploaded."),
        }
    }

    pub fn rejected(field: &str, kind: DocumentErrorKind) -> Self {
        Self {
            category: kind.code().to_owned(),
            field: field.to_owned(),
            message: kind.message().to_owned(),
        }
    }
}

/// A communication file accepted for saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedCommunication {
    pub field: &'static str,
    pub path: String,
    pub download_filename: String,
    pub bytes: Vec<u8>,
}

/// Accepted and refused communication uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommunicationsOutcome {
    pub staged: Vec<StagedCommunication>,
    pub errors: BTreeMap<&'static str, DocumentErrorKind>,
}

/// Check each submitted communication file against its field's format.
///
/// Parts without a body are ignored.
pub fn validate_communications(framework_slug: &str, uploads: &UploadSet) -> CommunicationsOutcome {
    let mut outcome = CommunicationsOutcome::default();
    for field in COMMUNICATION_FIELDS {
        let Some(upload) = uploads.get(field.name).filter(|upload| upload.has_content()) else {
            continue;
        };
        if field.format.accepts(upload) {
            let filename = upload.basename();
            outcome.staged.push(StagedCommunication {
                field: field.name,
                path: field.object_path(framework_slug, filename),
                download_filename: filename.to_owned(),
                bytes: upload.bytes.clone(),
            });
        } else {
            outcome
                .errors
                .insert(field.name, DocumentErrorKind::wrong_format(field.format));
        }
    }
    outcome
}

/// The most recently modified object, or `None` for an empty listing.
pub fn newest(objects: Vec<StoredObject>) -> Option<StoredObject> {
    objects
        .into_iter()
        .max_by(|a, b| a.last_modified.cmp(&b.last_modified))
}
