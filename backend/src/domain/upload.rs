//! Uploaded files and the formats they are checked against.

use std::path::Path;

/// One file part from a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub field: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(field: impl Into<String>, filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            filename: filename.into(),
            bytes,
        }
    }

    /// An empty filename with an empty body means the field was not
    /// submitted.
    pub fn is_blank(&self) -> bool {
        self.filename.is_empty() && self.bytes.is_empty()
    }

    pub fn has_content(&self) -> bool {
        !self.bytes.is_empty()
    }

    /// The last component of the client-supplied filename.
    ///
    /// Browsers may send a full path, with either separator; only the name
    /// after the final one is kept.
    pub fn basename(&self) -> &str {
        self.filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.filename)
    }

    /// Lower-cased extension of the filename, without the dot.
    pub fn extension(&self) -> Option<String> {
        Path::new(self.basename())
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }
}

/// Every file part of one submission, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSet {
    uploads: Vec<Upload>,
}

impl UploadSet {
    pub fn new(uploads: Vec<Upload>) -> Self {
        Self { uploads }
    }

    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Upload> {
        self.uploads.iter()
    }

    /// The part that represents `field`.
    ///
    /// Browsers can send several parts under one name. The first part with a
    /// body wins, then the first part with a filename; blank parts never
    /// shadow either.
    ///
    /// # Examples
    /// ```
    /// use marketplace_admin::domain::{Upload, UploadSet};
    ///
    /// let set = UploadSet::new(vec![
    ///     Upload::new("pricingDocumentURL", "", Vec::new()),
    ///     Upload::new("pricingDocumentURL", "test.pdf", b"doc".to_vec()),
    /// ]);
    /// let chosen = set.get("pricingDocumentURL").unwrap();
    /// assert_eq!(chosen.filename, "test.pdf");
    /// ```
    pub fn get(&self, field: &str) -> Option<&Upload> {
        let mut parts = self.uploads.iter().filter(|upload| upload.field == field);
        let first = parts.clone().next()?;
        parts
            .clone()
            .find(|upload| upload.has_content())
            .or_else(|| parts.find(|upload| !upload.filename.is_empty()))
            .or(Some(first))
    }
}

impl FromIterator<Upload> for UploadSet {
    fn from_iter<I: IntoIterator<Item = Upload>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// File formats a field accepts, judged by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Pdf,
    OpenDocumentOrCsv,
}

impl FileFormat {
    /// Accepted extensions, lower case and without the dot.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Pdf => &["pdf"],
            Self::OpenDocumentOrCsv => &["odt", "ods", "odp", "csv"],
        }
    }

    /// Whether `upload` has an accepted extension, ignoring case.
    pub fn accepts(self, upload: &Upload) -> bool {
        upload
            .extension()
            .is_some_and(|ext| self.extensions().contains(&ext.as_str()))
    }
}
