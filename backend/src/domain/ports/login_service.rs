//! Driving port for staff sign-in.
//!
//! Handlers call this port with validated credentials and never see how the
//! password is checked.

use async_trait::async_trait;

use crate::domain::{AdminUser, Error, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the signed-in staff member.
    ///
    /// Refused credentials and accounts without an admin role are
    /// `unauthorized`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AdminUser, Error>;
}
