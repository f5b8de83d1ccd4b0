//! Staff sign-in backed by the data API.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{DataApi, LoginService};
use crate::domain::{AdminUser, Error, LoginCredentials};

/// [`LoginService`] that checks passwords with the data API and admits only
/// accounts holding an administrative role.
#[derive(Clone)]
pub struct AdminLoginService {
    data_api: Arc<dyn DataApi>,
}

impl AdminLoginService {
    pub fn new(data_api: Arc<dyn DataApi>) -> Self {
        Self { data_api }
    }
}

#[async_trait]
impl LoginService for AdminLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AdminUser, Error> {
        let user = self
            .data_api
            .authenticate_user(credentials.email_address(), credentials.password())
            .await
            .map_err(|error| {
                warn!(%error, "authentication call failed");
                Error::service_unavailable("unable to check credentials")
            })?
            .ok_or_else(|| {
                Error::unauthorized("Make sure you've entered the right email address and password")
            })?;

        if user.role().is_none() {
            info!(user_id = user.id, role = %user.role, "non-admin account refused");
            return Err(Error::unauthorized(
                "Make sure you've entered the right email address and password",
            ));
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{DataApiError, MockDataApi};
    use rstest::rstest;

    fn staff(role: &str) -> AdminUser {
        AdminUser {
            id: 4,
            name: "Ops".to_owned(),
            email_address: "ops@example.gov".to_owned(),
            role: role.to_owned(),
        }
    }

    fn credentials() -> LoginCredentials {
        LoginCredentials::try_from_parts("ops@example.gov", "secret").expect("credentials")
    }

    #[rstest]
    #[case(Some("admin"), Ok(()))]
    #[case(Some("admin-framework-manager"), Ok(()))]
    #[case(Some("supplier"), Err(ErrorCode::Unauthorized))]
    #[case(None, Err(ErrorCode::Unauthorized))]
    #[tokio::test]
    async fn only_admin_roles_sign_in(
        #[case] role: Option<&'static str>,
        #[case] expected: Result<(), ErrorCode>,
    ) {
        let mut api = MockDataApi::new();
        api.expect_authenticate_user()
            .withf(|email, password| email == "ops@example.gov" && password == "secret")
            .returning(move |_, _| Ok(role.map(staff)));
        let service = AdminLoginService::new(Arc::new(api));

        let result = service.authenticate(&credentials()).await;
        assert_eq!(result.map(|_| ()).map_err(|e| e.code()), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn transport_failure_is_service_unavailable() {
        let mut api = MockDataApi::new();
        api.expect_authenticate_user()
            .returning(|_, _| Err(DataApiError::transport("timeout")));
        let service = AdminLoginService::new(Arc::new(api));

        let error = service
            .authenticate(&credentials())
            .await
            .expect_err("transport failure");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
