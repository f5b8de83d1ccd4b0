//! Shared helpers for the HTTP integration tests.
//!
//! Each test crate builds the full admin application over in-memory or
//! temporary-directory adapters and drives it with `actix_web::test`.

#![allow(dead_code, reason = "not every test crate uses every helper")]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use marketplace_admin::inbound::http::configure;
use marketplace_admin::inbound::http::state::HttpState;
use serde_json::Value;

pub const PASSWORD: &str = "correct horse";
const BOUNDARY: &str = "----integration-boundary";

/// The full set of admin pages behind a cookie session.
pub async fn admin_app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(session)
            .configure(configure),
    )
    .await
}

/// What a test needs from a response, owned so the app can be reused.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub location: Option<String>,
    pub content_type: Option<String>,
    pub cookie: Option<Cookie<'static>>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("JSON body")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("UTF-8 body")
    }
}

pub async fn call<S, B>(app: &S, request: Request) -> Reply
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, request).await;
    let status = res.status();
    let header_text = |name| {
        res.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };
    let location = header_text(header::LOCATION);
    let content_type = header_text(header::CONTENT_TYPE);
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned);
    let body = test::read_body(res).await.to_vec();
    Reply {
        status,
        location,
        content_type,
        cookie,
        body,
    }
}

/// Sign in through the login form and return the session cookie.
pub async fn sign_in<S, B>(app: &S, email_address: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let reply = call(
        app,
        test::TestRequest::post()
            .uri("/admin/login")
            .set_form([("email_address", email_address), ("password", PASSWORD)])
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::FOUND, "sign in as {email_address}");
    reply.cookie.expect("session cookie")
}

pub async fn get<S, B>(app: &S, uri: &str, cookie: &Cookie<'static>) -> Reply
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    call(
        app,
        test::TestRequest::get()
            .uri(uri)
            .cookie(cookie.clone())
            .to_request(),
    )
    .await
}

/// POST `(field, filename, bytes)` parts as `multipart/form-data`.
pub async fn post_files<S, B>(
    app: &S,
    uri: &str,
    cookie: &Cookie<'static>,
    parts: &[(&str, &str, &[u8])],
) -> Reply
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut body = Vec::new();
    for (field, filename, bytes) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    call(
        app,
        test::TestRequest::post()
            .uri(uri)
            .cookie(cookie.clone())
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(body)
            .to_request(),
    )
    .await
}
