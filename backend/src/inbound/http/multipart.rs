//! Reading `multipart/form-data` bodies into an [`UploadSet`].

use actix_multipart::{Field, Multipart};
use futures_util::TryStreamExt;
use tracing::warn;

use crate::domain::{Error, Upload, UploadSet};

/// Largest body accepted across all parts.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Collect every part of a multipart body, in submission order.
///
/// Parts without a name are dropped. Parts without a filename are kept with
/// an empty filename so blank file inputs still count as "present".
pub async fn read_uploads(mut payload: Multipart) -> Result<UploadSet, Error> {
    let mut uploads = Vec::new();
    let mut total = 0usize;
    while let Some(field) = payload.try_next().await.map_err(malformed)? {
        let Some(name) = field.name().map(str::to_owned) else {
            warn!("ignoring multipart part without a name");
            continue;
        };
        let filename = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .unwrap_or_default()
            .to_owned();
        let bytes = read_body(field, &mut total).await?;
        uploads.push(Upload::new(name, filename, bytes));
    }
    Ok(UploadSet::new(uploads))
}

async fn read_body(mut field: Field, total: &mut usize) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        *total += chunk.len();
        if *total > MAX_UPLOAD_BYTES {
            return Err(Error::invalid_request(format!(
                "upload exceeds {MAX_UPLOAD_BYTES} bytes"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn malformed(error: actix_multipart::MultipartError) -> Error {
    warn!(%error, "malformed multipart body");
    Error::invalid_request(format!("malformed upload: {error}"))
}
