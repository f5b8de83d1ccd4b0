//! Driven port for the object store holding documents and reports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

use super::define_port_error;

/// One entry from a bucket listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    /// Path relative to the bucket root.
    pub path: String,
    pub last_modified: DateTime<Utc>,
}

impl StoredObject {
    pub fn new(path: impl Into<String>, last_modified: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            last_modified,
        }
    }

    /// Final path segment.
    pub fn filename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

define_port_error! {
    /// Errors raised by object store adapters.
    pub enum DocumentStoreError {
        /// The bucket is not configured.
        UnknownBucket { bucket: String } => "unknown bucket: {bucket}",
        /// The path escapes the bucket or is malformed.
        InvalidPath { path: String } => "invalid object path: {path}",
        /// Reading or writing failed.
        Io { message: String } => "object store I/O failed: {message}",
    }
}

/// Port for saving, listing, and linking to stored objects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Write `bytes` to `path`. Downloads are offered as `download_filename`.
    async fn save(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        download_filename: &str,
    ) -> Result<(), DocumentStoreError>;

    /// Objects whose path starts with `prefix`.
    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<StoredObject>, DocumentStoreError>;

    /// A time-limited link to `path`, rooted at `base_url`.
    fn signed_url(
        &self,
        bucket: &str,
        path: &str,
        base_url: &Url,
    ) -> Result<Url, DocumentStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("g-cloud-12/communications/updates/clarifications/answers.pdf", "answers.pdf")]
    #[case("top-level.csv", "top-level.csv")]
    fn filename_is_last_segment(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(StoredObject::new(path, Utc::now()).filename(), expected);
    }
}
