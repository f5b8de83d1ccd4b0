//! Session helpers so handlers only deal with the signed-in admin and their
//! pending flash messages, never with raw cookie keys.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{AdminUser, Error, Flash, Gate};

pub(crate) const ADMIN_USER_KEY: &str = "admin_user";
pub(crate) const FLASHES_KEY: &str = "flashes";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the signed-in admin in the session cookie.
    pub fn persist_admin(&self, user: &AdminUser) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ADMIN_USER_KEY, user)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The signed-in admin, if any. A cookie that no longer decodes counts as
    /// signed out.
    pub fn admin_user(&self) -> Result<Option<AdminUser>, Error> {
        match self.0.get::<AdminUser>(ADMIN_USER_KEY) {
            Ok(user) => Ok(user),
            Err(error) => {
                warn!(%error, "discarding unreadable admin session");
                Ok(None)
            }
        }
    }

    /// Require a signed-in admin, otherwise redirect to login.
    pub fn require_admin(&self) -> Result<AdminUser, Error> {
        self.admin_user()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Require a signed-in admin whose role passes `gate`.
    ///
    /// Signed-out requests are `unauthorized`; a role outside the gate is
    /// `forbidden`.
    pub fn require_gate(&self, gate: Gate) -> Result<AdminUser, Error> {
        let user = self.require_admin()?;
        if gate.permits(user.role()) {
            Ok(user)
        } else {
            warn!(role = %user.role, ?gate, "role refused at gate");
            Err(Error::forbidden("You don't have permission to view this page"))
        }
    }

    /// Queue a flash message for the next page view.
    pub fn push_flash(&self, flash: Flash) -> Result<(), Error> {
        let mut flashes = self.read_flashes()?;
        flashes.push(flash);
        self.0
            .insert(FLASHES_KEY, flashes)
            .map_err(|error| Error::internal(format!("failed to persist flash: {error}")))
    }

    /// Drain queued flash messages.
    pub fn take_flashes(&self) -> Result<Vec<Flash>, Error> {
        let flashes = self.read_flashes()?;
        self.0.remove(FLASHES_KEY);
        Ok(flashes)
    }

    /// Forget everything, signing the admin out.
    pub fn clear(&self) {
        self.0.purge();
    }

    fn read_flashes(&self) -> Result<Vec<Flash>, Error> {
        self.0
            .get::<Vec<Flash>>(FLASHES_KEY)
            .map(Option::unwrap_or_default)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
