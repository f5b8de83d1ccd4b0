//! Time-limited download links.
//!
//! A link is `<base>/<bucket>/<path>?expires=<unix>&signature=<hex>`, where
//! the signature is an HMAC-SHA256 over the length-prefixed bucket, path and
//! expiry. Whoever serves the files checks it with [`UrlSigner::verify`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use hmac::digest::{Key, KeyInit};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use url::Url;

type HmacSha256 = Hmac<Sha256>;

pub const EXPIRES_PARAM: &str = "expires";
pub const SIGNATURE_PARAM: &str = "signature";

/// Signs and checks download links with a shared secret.
#[derive(Clone)]
pub struct UrlSigner {
    key: HmacSha256,
    ttl: Duration,
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl UrlSigner {
    pub fn new(secret: impl AsRef<[u8]>, ttl: Duration) -> Self {
        Self {
            key: keyed(secret.as_ref()),
            ttl,
        }
    }

    fn mac(&self, bucket: &str, path: &str, expires: i64) -> HmacSha256 {
        let mut mac = self.key.clone();
        let expires = expires.to_be_bytes();
        let parts: [&[u8]; 3] = [bucket.as_bytes(), path.as_bytes(), &expires];
        for part in parts {
            mac.update(&u64::try_from(part.len()).unwrap_or(u64::MAX).to_be_bytes());
            mac.update(part);
        }
        mac
    }

    /// A link to `bucket/path` below `base`, valid for the signer's TTL from
    /// `now`.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    ///
    /// use chrono::{TimeZone, Utc};
    /// use marketplace_admin::outbound::document_store::UrlSigner;
    /// use url::Url;
    ///
    /// let signer = UrlSigner::new("secret", Duration::from_secs(60));
    /// let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    /// let base = Url::parse("https://assets.example.com").unwrap();
    /// let url = signer
    ///     .sign("reports", "g-cloud-9/reports/list.csv", &base, now)
    ///     .unwrap();
    /// assert_eq!(url.path(), "/reports/g-cloud-9/reports/list.csv");
    /// assert!(signer.verify("reports", "g-cloud-9/reports/list.csv", &url, now));
    /// ```
    pub fn sign(
        &self,
        bucket: &str,
        path: &str,
        base: &Url,
        now: DateTime<Utc>,
    ) -> Result<Url, url::ParseError> {
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let expires = now.timestamp().saturating_add(ttl);
        let mut url = directory(base).join(&format!("{bucket}/{path}"))?;
        url.query_pairs_mut()
            .clear()
            .append_pair(EXPIRES_PARAM, &expires.to_string())
            .append_pair(
                SIGNATURE_PARAM,
                &hex::encode(self.mac(bucket, path, expires).finalize().into_bytes()),
            );
        Ok(url)
    }

    /// Whether `url` carries a valid, unexpired signature for `bucket/path`.
    pub fn verify(&self, bucket: &str, path: &str, url: &Url, now: DateTime<Utc>) -> bool {
        let mut expires = None;
        let mut signature = None;
        for (name, value) in url.query_pairs() {
            match name.as_ref() {
                EXPIRES_PARAM => expires = value.parse::<i64>().ok(),
                SIGNATURE_PARAM => signature = hex::decode(value.as_bytes()).ok(),
                _ => {}
            }
        }
        match (expires, signature) {
            (Some(expires), Some(signature)) => {
                expires >= now.timestamp()
                    && self
                        .mac(bucket, path, expires)
                        .verify_slice(&signature)
                        .is_ok()
            }
            _ => false,
        }
    }
}

/// HMAC keyed per RFC 2104: secrets longer than a block are hashed first,
/// shorter ones are zero-padded.
fn keyed(secret: &[u8]) -> HmacSha256 {
    let mut key = Key::<HmacSha256>::default();
    let hashed;
    let material = if secret.len() > key.len() {
        hashed = Sha256::digest(secret);
        hashed.as_slice()
    } else {
        secret
    };
    key.iter_mut()
        .zip(material)
        .for_each(|(slot, byte)| *slot = *byte);
    <HmacSha256 as KeyInit>::new(&key)
}

/// `base` with a trailing slash so joins stay below it.
fn directory(base: &Url) -> Url {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}
