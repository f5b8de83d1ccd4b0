//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};
use actix_http::Request;

use std::sync::Arc;

use url::Url;

use crate::domain::{AdminUser, Error};
use crate::inbound::http::session::SessionContext;
use crate::domain::ports::{
    MockCommunicationsCommand, MockDataApi, MockDocumentStore, MockLoginService,
    MockServiceDocumentsCommand,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts, ReportLinks};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// An admin with the given role string.
pub fn admin_user(role: &str) -> AdminUser {
    AdminUser {
        id: 7,
        name: "Test Admin".to_owned(),
        email_address: "test.admin@example.gov".to_owned(),
        role: role.to_owned(),
    }
}

/// The `session` cookie set by a response.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// HTTP state backed by expectation-free mocks, customised by `configure`.
///
/// Any port the test does not replace panics when called.
pub fn http_state_with(configure: impl FnOnce(&mut HttpStatePorts)) -> HttpState {
    let mut ports = HttpStatePorts {
        login: Arc::new(MockLoginService::new()),
        documents: Arc::new(MockServiceDocumentsCommand::new()),
        communications: Arc::new(MockCommunicationsCommand::new()),
        data_api: Arc::new(MockDataApi::new()),
        store: Arc::new(MockDocumentStore::new()),
    };
    configure(&mut ports);
    HttpState::new(
        ports,
        ReportLinks {
            bucket: "reports".to_owned(),
            assets_url: Url::parse("http://example.com").expect("static url"),
        },
    )
}

/// Test-only route storing an admin whose role is the last path segment.
pub async fn sign_in_as(
    session: SessionContext,
    role: web::Path<String>,
) -> Result<HttpResponse, Error> {
    session.persist_admin(&admin_user(&role))?;
    Ok(HttpResponse::Ok().finish())
}

/// Route pattern to mount [`sign_in_as`] on.
pub const SIGN_IN_ROUTE: &str = "/test/sign-in/{role}";

/// Sign in through [`SIGN_IN_ROUTE`] and return the session cookie.
pub async fn sign_in<S, B>(app: &S, role: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("/test/sign-in/{role}"))
            .to_request(),
    )
    .await;
    session_cookie(&res)
}
