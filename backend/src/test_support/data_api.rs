//! In-memory stand-in for the marketplace data API.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{DataApi, DataApiError};
use crate::domain::{AdminUser, Framework, Service, ServiceId, ServicePatch, UserAccount};

/// An update the API accepted, as the caller sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedUpdate {
    pub service_id: ServiceId,
    pub patch: ServicePatch,
    pub updated_by: String,
    pub update_reason: String,
}

#[derive(Default)]
struct Records {
    frameworks: Vec<Framework>,
    services: HashMap<ServiceId, Service>,
    users: Vec<UserAccount>,
    admins: Vec<(String, String, AdminUser)>,
    updates: Vec<RecordedUpdate>,
    update_rejection: Option<(u16, String)>,
    unavailable: bool,
}

/// [`DataApi`] over records held in memory.
///
/// # Examples
/// ```
/// use marketplace_admin::domain::ports::DataApi;
/// use marketplace_admin::domain::FrameworkStatus;
/// use marketplace_admin::test_support::{InMemoryDataApi, framework};
///
/// # tokio_test_block_on(async {
/// let api = InMemoryDataApi::default()
///     .with_framework(framework(12, "g-cloud-12", "G-Cloud 12", FrameworkStatus::Live));
/// let found = api.get_framework("g-cloud-12").await.unwrap();
/// assert_eq!(found.map(|f| f.name), Some("G-Cloud 12".to_owned()));
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Default)]
pub struct InMemoryDataApi {
    records: Mutex<Records>,
}

impl InMemoryDataApi {
    fn records(&self) -> MutexGuard<'_, Records> {
        match self.records.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("data API records mutex"),
        }
    }

    #[must_use]
    pub fn with_framework(self, framework: Framework) -> Self {
        self.records().frameworks.push(framework);
        self
    }

    #[must_use]
    pub fn with_service(self, service: Service) -> Self {
        self.records().services.insert(service.id.clone(), service);
        self
    }

    #[must_use]
    pub fn with_user(self, user: UserAccount) -> Self {
        self.records().users.push(user);
        self
    }

    /// Staff account accepted by `authenticate_user` with `password`.
    #[must_use]
    pub fn with_admin(self, user: AdminUser, password: &str) -> Self {
        self.records().admins.push((
            user.email_address.clone(),
            password.to_owned(),
            user,
        ));
        self
    }

    /// Refuse every service update with `status` and `content`.
    #[must_use]
    pub fn rejecting_updates(self, status: u16, content: &str) -> Self {
        self.records().update_rejection = Some((status, content.to_owned()));
        self
    }

    /// Fail every call as if the API could not be reached.
    #[must_use]
    pub fn unavailable(self) -> Self {
        self.records().unavailable = true;
        self
    }

    /// Current state of a service, including accepted updates.
    pub fn service(&self, id: &str) -> Option<Service> {
        self.records().services.get(&ServiceId::new(id)).cloned()
    }

    /// Updates accepted so far, oldest first.
    pub fn updates(&self) -> Vec<RecordedUpdate> {
        self.records().updates.clone()
    }

    fn check_available(&self) -> Result<(), DataApiError> {
        if self.records().unavailable {
            Err(DataApiError::transport("connection refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DataApi for InMemoryDataApi {
    async fn find_frameworks(&self) -> Result<Vec<Framework>, DataApiError> {
        self.check_available()?;
        Ok(self.records().frameworks.clone())
    }

    async fn get_framework(&self, slug: &str) -> Result<Option<Framework>, DataApiError> {
        self.check_available()?;
        Ok(self
            .records()
            .frameworks
            .iter()
            .find(|framework| framework.slug == slug)
            .cloned())
    }

    async fn get_service(&self, id: &ServiceId) -> Result<Option<Service>, DataApiError> {
        self.check_available()?;
        Ok(self.records().services.get(id).cloned())
    }

    async fn update_service(
        &self,
        id: &ServiceId,
        patch: &ServicePatch,
        updated_by: &str,
        update_reason: &str,
    ) -> Result<(), DataApiError> {
        self.check_available()?;
        let mut records = self.records();
        if let Some((status, content)) = &records.update_rejection {
            return Err(DataApiError::rejected(*status, content.as_str()));
        }
        let Some(current) = records.services.get(id) else {
            return Err(DataApiError::rejected(404_u16, format!("service {id} not found")));
        };
        let updated = current.with_patch(patch);
        records.services.insert(id.clone(), updated);
        records.updates.push(RecordedUpdate {
            service_id: id.clone(),
            patch: patch.clone(),
            updated_by: updated_by.to_owned(),
            update_reason: update_reason.to_owned(),
        });
        Ok(())
    }

    async fn get_user(&self, email_address: &str) -> Result<Option<UserAccount>, DataApiError> {
        self.check_available()?;
        Ok(self
            .records()
            .users
            .iter()
            .find(|user| user.email_address == email_address)
            .cloned())
    }

    async fn find_buyer_users(&self) -> Result<Vec<UserAccount>, DataApiError> {
        self.check_available()?;
        Ok(self
            .records()
            .users
            .iter()
            .filter(|user| user.role == "buyer")
            .cloned()
            .collect())
    }

    async fn authenticate_user(
        &self,
        email_address: &str,
        password: &str,
    ) -> Result<Option<AdminUser>, DataApiError> {
        self.check_available()?;
        Ok(self
            .records()
            .admins
            .iter()
            .find(|(email, secret, _)| email == email_address && secret == password)
            .map(|(_, _, user)| user.clone()))
    }
}
