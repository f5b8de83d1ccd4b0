//! Envelopes used by the data API.
//!
//! Records are wrapped in a key named after their collection. List endpoints
//! are paged and advertise the next page in `links.next`.

use serde::{Deserialize, Serialize};

use crate::domain::{AdminUser, Framework, Service, ServicePatch, UserAccount};

#[derive(Debug, Deserialize)]
pub(super) struct FrameworksDto {
    pub(super) frameworks: Vec<Framework>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FrameworkDto {
    pub(super) frameworks: Framework,
}

#[derive(Debug, Deserialize)]
pub(super) struct ServiceDto {
    pub(super) services: Service,
}

/// `GET /users?email_address=` answers with a single record, older API
/// versions with a one-element list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub(super) fn into_first(self) -> Option<T> {
        match self {
            Self::One(item) => Some(item),
            Self::Many(items) => items.into_iter().next(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UserLookupDto {
    pub(super) users: OneOrMany<UserAccount>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct LinksDto {
    #[serde(default)]
    pub(super) next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UsersPageDto {
    #[serde(default)]
    pub(super) users: Vec<UserAccount>,
    #[serde(default)]
    pub(super) links: LinksDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthenticatedUserDto {
    pub(super) users: AdminUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AuthCredentialsDto<'a> {
    pub(super) email_address: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AuthRequestDto<'a> {
    pub(super) auth_users: AuthCredentialsDto<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct ServiceUpdateDto<'a> {
    pub(super) updated_by: &'a str,
    pub(super) update_reason: &'a str,
    pub(super) services: &'a ServicePatch,
}
