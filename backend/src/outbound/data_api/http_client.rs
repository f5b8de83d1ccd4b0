//! Reqwest-backed data API client.
//!
//! This adapter owns transport details only: bearer authorisation, the
//! request timeout, paging, status mapping and JSON decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{
    AuthCredentialsDto, AuthRequestDto, AuthenticatedUserDto, FrameworkDto, FrameworksDto,
    ServiceDto, ServiceUpdateDto, UserLookupDto, UsersPageDto,
};
use crate::domain::ports::{DataApi, DataApiError};
use crate::domain::{AdminUser, Framework, Service, ServiceId, ServicePatch, UserAccount};

/// Upper bound on pages followed for one listing.
const MAX_PAGES: usize = 1000;

/// Data API adapter talking JSON over HTTP to one base URL.
pub struct HttpDataApi {
    client: Client,
    base_url: Url,
    auth_token: String,
}

impl HttpDataApi {
    /// Build a client with an explicit request timeout.
    ///
    /// Endpoint paths are resolved below `base_url`, which is treated as a
    /// directory whether or not it ends in `/`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        mut base_url: Url,
        auth_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            auth_token: auth_token.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, DataApiError> {
        self.base_url.join(path).map_err(|error| {
            DataApiError::transport(format!("invalid data API path {path}: {error}"))
        })
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.auth_token)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Send `request`; `None` when the API answers 404.
    async fn send(&self, request: RequestBuilder) -> Result<Option<Vec<u8>>, DataApiError> {
        let response = self
            .authorised(request)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(Some(body.to_vec()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, DataApiError> {
        debug!(%url, "data API GET");
        match self.send(self.client.get(url)).await? {
            Some(body) => decode(&body).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl DataApi for HttpDataApi {
    async fn find_frameworks(&self) -> Result<Vec<Framework>, DataApiError> {
        let url = self.endpoint("frameworks")?;
        let page: Option<FrameworksDto> = self.get_json(url).await?;
        Ok(page.map(|dto| dto.frameworks).unwrap_or_default())
    }

    async fn get_framework(&self, slug: &str) -> Result<Option<Framework>, DataApiError> {
        let url = self.endpoint(&format!("frameworks/{slug}"))?;
        let dto: Option<FrameworkDto> = self.get_json(url).await?;
        Ok(dto.map(|dto| dto.frameworks))
    }

    async fn get_service(&self, id: &ServiceId) -> Result<Option<Service>, DataApiError> {
        let url = self.endpoint(&format!("services/{id}"))?;
        let dto: Option<ServiceDto> = self.get_json(url).await?;
        Ok(dto.map(|dto| dto.services))
    }

    async fn update_service(
        &self,
        id: &ServiceId,
        patch: &ServicePatch,
        updated_by: &str,
        update_reason: &str,
    ) -> Result<(), DataApiError> {
        let url = self.endpoint(&format!("services/{id}"))?;
        let body = ServiceUpdateDto {
            updated_by,
            update_reason,
            services: patch,
        };
        match self.send(self.client.post(url).json(&body)).await? {
            Some(_) => Ok(()),
            None => Err(DataApiError::rejected(
                StatusCode::NOT_FOUND.as_u16(),
                format!("service {id} not found"),
            )),
        }
    }

    async fn get_user(&self, email_address: &str) -> Result<Option<UserAccount>, DataApiError> {
        let mut url = self.endpoint("users")?;
        url.query_pairs_mut().append_pair("email_address", email_address);
        let dto: Option<UserLookupDto> = self.get_json(url).await?;
        Ok(dto.and_then(|dto| dto.users.into_first()))
    }

    async fn find_buyer_users(&self) -> Result<Vec<UserAccount>, DataApiError> {
        let mut url = self.endpoint("users")?;
        url.query_pairs_mut().append_pair("role", "buyer");
        let mut next = Some(url);
        let mut users = Vec::new();
        for _ in 0..MAX_PAGES {
            let Some(url) = next.take() else {
                return Ok(users);
            };
            let Some(page) = self.get_json::<UsersPageDto>(url).await? else {
                return Ok(users);
            };
            users.extend(page.users);
            next = page
                .links
                .next
                .map(|link| {
                    Url::parse(&link).map_err(|error| {
                        DataApiError::decode(format!("invalid next page link {link}: {error}"))
                    })
                })
                .transpose()?;
        }
        Err(DataApiError::decode(format!(
            "buyer listing exceeded {MAX_PAGES} pages"
        )))
    }

    async fn authenticate_user(
        &self,
        email_address: &str,
        password: &str,
    ) -> Result<Option<AdminUser>, DataApiError> {
        let url = self.endpoint("users/auth")?;
        let body = AuthRequestDto {
            auth_users: AuthCredentialsDto {
                email_address,
                password,
            },
        };
        let response = self
            .authorised(self.client.post(url).json(&body))
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        match status {
            StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => Ok(None),
            _ if status.is_success() => {
                decode::<AuthenticatedUserDto>(body.as_ref()).map(|dto| Some(dto.users))
            }
            _ => Err(map_status_error(status, body.as_ref())),
        }
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, DataApiError> {
    serde_json::from_slice(body)
        .map_err(|error| DataApiError::decode(format!("invalid data API JSON: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> DataApiError {
    DataApiError::transport(error.to_string())
}

/// Non-success answers become rejections carrying the API's payload
/// unchanged. Only an empty body is replaced, by the bare status.
fn map_status_error(status: StatusCode, body: &[u8]) -> DataApiError {
    warn!(status = status.as_u16(), body = %body_preview(body), "data API refused request");
    let content = if body.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        String::from_utf8_lossy(body).into_owned()
    };
    DataApiError::rejected(status.as_u16(), content)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
