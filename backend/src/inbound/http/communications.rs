//! Framework communications page.
//!
//! ```text
//! GET  /admin/communications/g-cloud-12
//! POST /admin/communications/g-cloud-12   (multipart/form-data)
//! ```
//!
//! Uploads always redirect back to the page; their outcome travels as flash
//! messages in the session and is shown once.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use tracing::info;

use crate::domain::ports::CommunicationsOverview;
use crate::domain::{Flash, Gate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::login::redirect_to;
use crate::inbound::http::multipart::read_uploads;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Serialize)]
pub struct CommunicationsPage {
    pub title: String,
    #[serde(flatten)]
    pub overview: CommunicationsOverview,
    pub messages: Vec<Flash>,
}

fn page_path(slug: &str) -> String {
    format!("/admin/communications/{slug}")
}

#[get("/admin/communications/{slug}")]
pub async fn communications_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    slug: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_gate(Gate::ManageCommunications)?;
    let overview = state.communications.overview(&slug).await?;
    let messages = session.take_flashes()?;
    Ok(HttpResponse::Ok().json(CommunicationsPage {
        title: format!("{} communications", overview.framework.name),
        overview,
        messages,
    }))
}

#[post("/admin/communications/{slug}")]
pub async fn upload_communications(
    state: web::Data<HttpState>,
    session: SessionContext,
    slug: web::Path<String>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let user = session.require_gate(Gate::ManageCommunications)?;
    let uploads = read_uploads(payload).await?;
    let flashes = state.communications.upload(&slug, &uploads).await?;
    info!(
        user_id = user.id,
        framework = %slug,
        outcomes = flashes.len(),
        "communications submitted"
    );
    for flash in flashes {
        session.push_flash(flash)?;
    }
    Ok(redirect_to(&page_path(&slug)))
}
