//! Object store doubles: one in memory, one on a temporary directory.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tempfile::TempDir;
use url::Url;

use super::clock::MutableClock;
use crate::domain::ports::{DocumentStore, DocumentStoreError, StoredObject};
use crate::outbound::document_store::{LocalDocumentStore, UrlSigner};

/// One saved object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedObject {
    pub bytes: Vec<u8>,
    pub download_filename: String,
    pub last_modified: DateTime<Utc>,
}

#[derive(Default)]
struct Objects {
    entries: BTreeMap<(String, String), SavedObject>,
    failing_paths: BTreeSet<String>,
}

/// [`DocumentStore`] keeping objects in a map.
///
/// Every bucket exists. Signed links carry a fixed `signature=in-memory`
/// query so tests can assert on them.
pub struct InMemoryDocumentStore {
    objects: Mutex<Objects>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::with_clock(Arc::new(MutableClock::at_fixture_time()))
    }
}

impl InMemoryDocumentStore {
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            objects: Mutex::new(Objects::default()),
            clock,
        }
    }

    fn objects(&self) -> MutexGuard<'_, Objects> {
        match self.objects.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("object store mutex"),
        }
    }

    /// Seed an object as if it had been saved at `last_modified`.
    #[must_use]
    pub fn with_object(self, bucket: &str, path: &str, last_modified: DateTime<Utc>) -> Self {
        let filename = path.rsplit('/').next().unwrap_or(path).to_owned();
        self.objects().entries.insert(
            (bucket.to_owned(), path.to_owned()),
            SavedObject {
                bytes: Vec::new(),
                download_filename: filename,
                last_modified,
            },
        );
        self
    }

    /// Make saves to any path ending in `suffix` fail with an I/O error.
    #[must_use]
    pub fn failing_saves_to(self, suffix: &str) -> Self {
        self.objects().failing_paths.insert(suffix.to_owned());
        self
    }

    pub fn object(&self, bucket: &str, path: &str) -> Option<SavedObject> {
        self.objects()
            .entries
            .get(&(bucket.to_owned(), path.to_owned()))
            .cloned()
    }

    /// Every stored path in `bucket`, sorted.
    pub fn paths(&self, bucket: &str) -> Vec<String> {
        self.objects()
            .entries
            .keys()
            .filter(|(stored_bucket, _)| stored_bucket == bucket)
            .map(|(_, path)| path.clone())
            .collect()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn save(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        download_filename: &str,
    ) -> Result<(), DocumentStoreError> {
        let last_modified = self.clock.utc();
        let mut objects = self.objects();
        if objects
            .failing_paths
            .iter()
            .any(|suffix| path.ends_with(suffix.as_str()))
        {
            return Err(DocumentStoreError::io(format!("write to {path} failed")));
        }
        objects.entries.insert(
            (bucket.to_owned(), path.to_owned()),
            SavedObject {
                bytes: bytes.to_vec(),
                download_filename: download_filename.to_owned(),
                last_modified,
            },
        );
        Ok(())
    }

    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<StoredObject>, DocumentStoreError> {
        Ok(self
            .objects()
            .entries
            .iter()
            .filter(|((stored_bucket, path), _)| {
                stored_bucket == bucket && path.starts_with(prefix)
            })
            .map(|((_, path), object)| StoredObject::new(path.clone(), object.last_modified))
            .collect())
    }

    fn signed_url(
        &self,
        bucket: &str,
        path: &str,
        base_url: &Url,
    ) -> Result<Url, DocumentStoreError> {
        let mut url = base_url
            .join(&format!("{bucket}/{path}"))
            .map_err(|_| DocumentStoreError::invalid_path(path))?;
        url.query_pairs_mut().append_pair("signature", "in-memory");
        Ok(url)
    }
}

/// A [`LocalDocumentStore`] rooted in a temporary directory that is removed
/// on drop.
pub struct TempDocumentStore {
    pub store: Arc<LocalDocumentStore>,
    root: TempDir,
}

impl TempDocumentStore {
    /// Signing secret used for every temporary store.
    pub const SECRET: &'static str = "test-signing-secret";

    /// Open the given buckets below a fresh temporary directory.
    ///
    /// # Panics
    ///
    /// Panics when the temporary directory cannot be created.
    pub fn open(buckets: &[&str], clock: Arc<dyn Clock>) -> Self {
        let root = match TempDir::new() {
            Ok(root) => root,
            Err(error) => panic!("temporary storage root: {error}"),
        };
        let store = match LocalDocumentStore::open(
            root.path(),
            buckets,
            Self::signer(),
            clock,
        ) {
            Ok(store) => store,
            Err(error) => panic!("temporary document store: {error}"),
        };
        Self {
            store: Arc::new(store),
            root,
        }
    }

    /// Signer matching the one the store was opened with.
    pub fn signer() -> UrlSigner {
        UrlSigner::new(Self::SECRET, Duration::from_secs(300))
    }

    pub fn root(&self) -> &std::path::Path {
        self.root.path()
    }
}
