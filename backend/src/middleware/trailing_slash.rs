//! Canonical paths: `/admin/users/` is answered with a permanent redirect to
//! `/admin/users`, keeping the query string.

use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};

/// Middleware redirecting paths that end in `/` (other than `/`) with 301.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use marketplace_admin::middleware::StripTrailingSlash;
///
/// let app = App::new().wrap(StripTrailingSlash);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct StripTrailingSlash;

impl<S, B> Transform<S, ServiceRequest> for StripTrailingSlash
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = StripTrailingSlashMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StripTrailingSlashMiddleware { service }))
    }
}

/// Service wrapper produced by [`StripTrailingSlash`].
pub struct StripTrailingSlashMiddleware<S> {
    service: S,
}

fn canonical_location(path: &str, query: &str) -> Option<String> {
    if path.len() <= 1 || !path.ends_with('/') {
        return None;
    }
    let trimmed = path.trim_end_matches('/');
    let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
    Some(if query.is_empty() {
        trimmed.to_owned()
    } else {
        format!("{trimmed}?{query}")
    })
}

impl<S, B> Service<ServiceRequest> for StripTrailingSlashMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(location) = canonical_location(req.path(), req.query_string()) {
            let response = HttpResponse::MovedPermanently()
                .insert_header((header::LOCATION, location))
                .finish()
                .map_into_right_body();
            let (request, _) = req.into_parts();
            return Box::pin(async move { Ok(ServiceResponse::new(request, response)) });
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
