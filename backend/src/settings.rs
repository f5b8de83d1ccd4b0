//! Application settings loaded via OrthoConfig.
//!
//! Every value may come from `ADMIN_*` environment variables or the matching
//! command-line flag. Unset values fall back to local development defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_DATA_API_URL: &str = "http://localhost:5000";
const DEFAULT_DATA_API_TIMEOUT_SECS: u64 = 10;
const DEFAULT_ASSETS_URL: &str = "http://localhost:8080/assets";
const DEFAULT_STORAGE_ROOT: &str = "./storage";
const DEFAULT_DOCUMENTS_BUCKET: &str = "documents";
const DEFAULT_COMMUNICATIONS_BUCKET: &str = "communications";
const DEFAULT_REPORTS_BUCKET: &str = "reports";
const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 300;
const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);

/// Errors raised when a configured value cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid URL for {name}='{value}': {source}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Settings for the admin frontend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ADMIN")]
pub struct AdminSettings {
    /// Base URL of the marketplace data API.
    pub data_api_url: Option<String>,
    /// Bearer token sent to the data API.
    pub data_api_auth_token: Option<String>,
    /// Per-request timeout for data API calls.
    pub data_api_timeout_secs: Option<u64>,
    /// Public base URL that document and report links are built on.
    pub assets_url: Option<String>,
    /// Directory holding one subdirectory per bucket.
    pub storage_root: Option<PathBuf>,
    pub documents_bucket: Option<String>,
    pub communications_bucket: Option<String>,
    pub reports_bucket: Option<String>,
    /// Secret mixed into signed download links.
    pub url_signing_secret: Option<String>,
    /// Lifetime of signed download links.
    pub signed_url_ttl_secs: Option<u64>,
    pub bind_addr: Option<SocketAddr>,
}

impl AdminSettings {
    pub fn data_api_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "data_api_url",
            self.data_api_url.as_deref().unwrap_or(DEFAULT_DATA_API_URL),
        )
    }

    /// Token for the data API; empty when unset.
    pub fn data_api_auth_token(&self) -> &str {
        self.data_api_auth_token.as_deref().unwrap_or_default()
    }

    pub fn data_api_timeout(&self) -> Duration {
        Duration::from_secs(
            self.data_api_timeout_secs
                .unwrap_or(DEFAULT_DATA_API_TIMEOUT_SECS),
        )
    }

    pub fn assets_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "assets_url",
            self.assets_url.as_deref().unwrap_or(DEFAULT_ASSETS_URL),
        )
    }

    pub fn storage_root(&self) -> PathBuf {
        self.storage_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_ROOT))
    }

    pub fn documents_bucket(&self) -> &str {
        self.documents_bucket
            .as_deref()
            .unwrap_or(DEFAULT_DOCUMENTS_BUCKET)
    }

    pub fn communications_bucket(&self) -> &str {
        self.communications_bucket
            .as_deref()
            .unwrap_or(DEFAULT_COMMUNICATIONS_BUCKET)
    }

    pub fn reports_bucket(&self) -> &str {
        self.reports_bucket
            .as_deref()
            .unwrap_or(DEFAULT_REPORTS_BUCKET)
    }

    /// Signing secret; empty when unset, which still yields stable links in
    /// development.
    pub fn url_signing_secret(&self) -> &str {
        self.url_signing_secret.as_deref().unwrap_or_default()
    }

    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.signed_url_ttl_secs.unwrap_or(DEFAULT_SIGNED_URL_TTL_SECS))
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from(DEFAULT_BIND_ADDR))
    }

    /// Every bucket the application reads or writes.
    pub fn buckets(&self) -> [&str; 3] {
        [
            self.documents_bucket(),
            self.communications_bucket(),
            self.reports_bucket(),
        ]
    }
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|source| SettingsError::InvalidUrl {
        name,
        value: value.to_owned(),
        source,
    })
}
