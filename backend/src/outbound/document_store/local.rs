//! Filesystem object store.
//!
//! Each bucket is a directory below the storage root, opened once through
//! `cap_std` so no object path can escape it. Every object has a sidecar
//! `<path>.meta.json` recording the download filename and save time.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use super::signing::UrlSigner;
use crate::domain::ports::{DocumentStore, DocumentStoreError, StoredObject};

const META_SUFFIX: &str = ".meta.json";

/// Sidecar metadata kept next to each object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub download_filename: String,
    pub saved_at: DateTime<Utc>,
}

/// [`DocumentStore`] over one directory per bucket.
pub struct LocalDocumentStore {
    buckets: HashMap<String, Arc<Dir>>,
    signer: UrlSigner,
    clock: Arc<dyn Clock>,
}

impl LocalDocumentStore {
    /// Open (creating if needed) a directory per bucket below `root`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when a bucket directory cannot be created or
    /// opened.
    pub fn open(
        root: &Path,
        buckets: &[&str],
        signer: UrlSigner,
        clock: Arc<dyn Clock>,
    ) -> io::Result<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let root_dir = Dir::open_ambient_dir(root, ambient_authority())?;
        let mut opened = HashMap::with_capacity(buckets.len());
        for bucket in buckets {
            root_dir.create_dir_all(bucket)?;
            opened.insert((*bucket).to_owned(), Arc::new(root_dir.open_dir(bucket)?));
        }
        Ok(Self {
            buckets: opened,
            signer,
            clock,
        })
    }

    fn bucket(&self, bucket: &str) -> Result<Arc<Dir>, DocumentStoreError> {
        self.buckets
            .get(bucket)
            .cloned()
            .ok_or_else(|| DocumentStoreError::unknown_bucket(bucket))
    }

    /// Sidecar metadata for an object, if it was saved through this store.
    ///
    /// # Errors
    ///
    /// Unknown buckets, invalid paths and unreadable sidecars are errors; a
    /// missing sidecar is `None`.
    pub async fn metadata(
        &self,
        bucket: &str,
        path: &str,
    ) -> Result<Option<ObjectMeta>, DocumentStoreError> {
        let dir = self.bucket(bucket)?;
        let path = checked_path(path)?;
        blocking(move || read_meta(&dir, &path)).await
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn save(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        download_filename: &str,
    ) -> Result<(), DocumentStoreError> {
        let dir = self.bucket(bucket)?;
        let path = checked_path(path)?;
        let bytes = bytes.to_vec();
        let meta = ObjectMeta {
            download_filename: download_filename.to_owned(),
            saved_at: self.clock.utc(),
        };
        debug!(bucket, %path, size = bytes.len(), "saving object");
        blocking(move || {
            if let Some(parent) = Path::new(&path).parent().filter(|p| !p.as_os_str().is_empty()) {
                dir.create_dir_all(parent).map_err(io_error)?;
            }
            dir.write(&path, &bytes).map_err(io_error)?;
            let sidecar = serde_json::to_vec(&meta)
                .map_err(|error| DocumentStoreError::io(error.to_string()))?;
            dir.write(format!("{path}{META_SUFFIX}"), sidecar)
                .map_err(io_error)
        })
        .await
    }

    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<StoredObject>, DocumentStoreError> {
        let dir = self.bucket(bucket)?;
        let prefix = prefix.to_owned();
        blocking(move || {
            let mut objects = Vec::new();
            walk(&dir, "", &mut objects).map_err(io_error)?;
            objects.retain(|object: &StoredObject| object.path.starts_with(&prefix));
            for object in &mut objects {
                if let Some(meta) = read_meta(&dir, &object.path)? {
                    object.last_modified = meta.saved_at;
                }
            }
            objects.sort_by(|a, b| a.path.cmp(&b.path));
            Ok(objects)
        })
        .await
    }

    fn signed_url(
        &self,
        bucket: &str,
        path: &str,
        base_url: &Url,
    ) -> Result<Url, DocumentStoreError> {
        self.bucket(bucket)?;
        let path = checked_path(path)?;
        self.signer
            .sign(bucket, &path, base_url, self.clock.utc())
            .map_err(|_| DocumentStoreError::invalid_path(path))
    }
}

/// Relative, normalised object path with no `..` or root components.
fn checked_path(path: &str) -> Result<String, DocumentStoreError> {
    let candidate = Path::new(path);
    let well_formed = !path.is_empty()
        && !path.ends_with(META_SUFFIX)
        && candidate
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if well_formed {
        Ok(path.to_owned())
    } else {
        Err(DocumentStoreError::invalid_path(path))
    }
}

fn read_meta(dir: &Dir, path: &str) -> Result<Option<ObjectMeta>, DocumentStoreError> {
    match dir.read(format!("{path}{META_SUFFIX}")) {
        Ok(raw) => serde_json::from_slice(&raw).map(Some).map_err(|error| {
            DocumentStoreError::io(format!("unreadable metadata for {path}: {error}"))
        }),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(io_error(error)),
    }
}

fn walk(dir: &Dir, base: &str, out: &mut Vec<StoredObject>) -> io::Result<()> {
    for entry in dir.entries()? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = if base.is_empty() {
            name
        } else {
            format!("{base}/{name}")
        };
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            walk(&entry.open_dir()?, &path, out)?;
        } else if file_type.is_file() && !path.ends_with(META_SUFFIX) {
            let modified = entry
                .metadata()?
                .modified()
                .map(|time| DateTime::<Utc>::from(time.into_std()))
                .unwrap_or_default();
            out.push(StoredObject::new(path, modified));
        }
    }
    Ok(())
}

fn io_error(error: io::Error) -> DocumentStoreError {
    DocumentStoreError::io(error.to_string())
}

async fn blocking<T, F>(work: F) -> Result<T, DocumentStoreError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, DocumentStoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|error| {
        warn!(%error, "object store task failed");
        DocumentStoreError::io(format!("object store task failed: {error}"))
    })?
}
