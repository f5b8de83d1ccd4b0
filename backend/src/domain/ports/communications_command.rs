//! Driving port for framework communications.

use async_trait::async_trait;
use serde::Serialize;

use super::StoredObject;
use crate::domain::{Error, Flash, Framework, UploadSet};

/// The communications page for one framework.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunicationsOverview {
    pub framework: Framework,
    /// Newest communication file, if any.
    pub communication: Option<StoredObject>,
    /// Newest clarification answers file, if any.
    pub clarification: Option<StoredObject>,
}

/// Port for viewing and uploading communications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunicationsCommand: Send + Sync {
    /// Missing frameworks are `not_found`.
    async fn overview(&self, framework_slug: &str) -> Result<CommunicationsOverview, Error>;

    /// Save accepted files and describe each outcome as a flash message.
    async fn upload(&self, framework_slug: &str, uploads: &UploadSet) -> Result<Vec<Flash>, Error>;
}
