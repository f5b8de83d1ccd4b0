//! Driven port for the marketplace data API.
//!
//! The data API owns every record the admin application shows or edits.
//! Lookups that can legitimately miss return `Option`; transport and decode
//! failures are errors, as are updates the API refuses.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{AdminUser, Framework, Service, ServiceId, ServicePatch, UserAccount};

define_port_error! {
    /// Errors raised while talking to the data API.
    pub enum DataApiError {
        /// The request never produced a response.
        Transport { message: String } => "data API transport failed: {message}",
        /// The API answered with a non-success status; `content` is its body.
        Rejected { status: u16, content: String } => "{content}",
        /// The response body did not match the expected shape.
        Decode { message: String } => "data API response decode failed: {message}",
    }
}

impl DataApiError {
    /// Upstream content to show to the user, if the API refused the call.
    pub fn rejection_content(&self) -> Option<&str> {
        match self {
            Self::Rejected { content, .. } => Some(content),
            _ => None,
        }
    }
}

/// Port for reading and updating marketplace records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataApi: Send + Sync {
    /// Every framework, in the order the API returns them.
    async fn find_frameworks(&self) -> Result<Vec<Framework>, DataApiError>;

    async fn get_framework(&self, slug: &str) -> Result<Option<Framework>, DataApiError>;

    async fn get_service(&self, id: &ServiceId) -> Result<Option<Service>, DataApiError>;

    /// Apply `patch` to a service, recording who changed it and why.
    async fn update_service(
        &self,
        id: &ServiceId,
        patch: &ServicePatch,
        updated_by: &str,
        update_reason: &str,
    ) -> Result<(), DataApiError>;

    async fn get_user(&self, email_address: &str) -> Result<Option<UserAccount>, DataApiError>;

    /// Every buyer account.
    async fn find_buyer_users(&self) -> Result<Vec<UserAccount>, DataApiError>;

    /// Check a staff member's password. `None` means the credentials were
    /// refused.
    async fn authenticate_user(
        &self,
        email_address: &str,
        password: &str,
    ) -> Result<Option<AdminUser>, DataApiError>;
}
