//! HTTP inbound adapter serving the admin pages under `/admin`.
//!
//! Pages render as JSON view models. Every handler resolves the signed-in
//! admin through [`session::SessionContext`] and reaches collaborators only
//! through the ports held in [`state::HttpState`].

pub mod communications;
pub mod error;
pub mod health;
pub mod home;
pub mod login;
pub mod multipart;
pub mod reports;
pub mod services;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::web;

pub use error::ApiResult;

/// Largest multipart body accepted by the upload forms.
pub use multipart::MAX_UPLOAD_BYTES;

/// Register every admin page.
///
/// The caller provides [`state::HttpState`] and a session middleware; the
/// readiness probe is registered separately because it needs neither.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use marketplace_admin::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home::home)
        .service(login::login_page)
        .service(login::login)
        .service(login::logout)
        .service(users::find_user)
        .service(users::download_buyers)
        .service(users::supplier_research_downloads)
        .service(reports::supplier_lists)
        .service(reports::download_user_accounts)
        .service(reports::download_official_details)
        .service(reports::download_user_research)
        .service(services::edit_documents_page)
        .service(services::update_documents)
        .service(services::view_service)
        .service(communications::communications_page)
        .service(communications::upload_communications);
}
