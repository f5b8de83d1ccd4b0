//! Sign-in and sign-out.
//!
//! ```text
//! GET  /admin/login
//! POST /admin/login   email_address=...&password=...
//! POST /admin/logout
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{ErrorCode, LoginCredentials};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::LOGIN_PATH;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Where a successful sign-in lands.
pub const HOME_PATH: &str = "/admin";

/// Login form body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub password: String,
}

/// The login page view model.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginPage {
    pub title: String,
    pub email_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoginPage {
    fn new(email_address: &str, error: Option<String>) -> Self {
        Self {
            title: "Administrator login".to_owned(),
            email_address: email_address.to_owned(),
            error,
        }
    }
}

pub(crate) fn redirect_to(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Show the login form, or go home if already signed in.
#[get("/admin/login")]
pub async fn login_page(session: SessionContext) -> ApiResult<HttpResponse> {
    if session.admin_user()?.is_some() {
        return Ok(redirect_to(HOME_PATH));
    }
    Ok(HttpResponse::Ok().json(LoginPage::new("", None)))
}

/// Check the credentials and start a session.
///
/// Refused credentials re-render the form with a message; only collaborator
/// failures surface as error responses.
#[post("/admin/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let LoginForm {
        email_address,
        password,
    } = form.into_inner();
    let credentials = match LoginCredentials::try_from_parts(&email_address, &password) {
        Ok(credentials) => credentials,
        Err(error) => {
            let page = LoginPage::new(&email_address, Some(error.to_string()));
            return Ok(HttpResponse::Ok().json(page));
        }
    };

    match state.login.authenticate(&credentials).await {
        Ok(user) => {
            session.persist_admin(&user)?;
            info!(user_id = user.id, role = %user.role, "admin signed in");
            Ok(redirect_to(HOME_PATH))
        }
        Err(error) if error.code() == ErrorCode::Unauthorized => Ok(HttpResponse::Ok().json(
            LoginPage::new(credentials.email_address(), Some(error.message().to_owned())),
        )),
        Err(error) => Err(error),
    }
}

/// End the session.
#[post("/admin/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    redirect_to(LOGIN_PATH)
}
