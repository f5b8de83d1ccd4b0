//! Supplier list pages and report downloads.
//!
//! Reports are generated elsewhere and kept in the reports bucket; these
//! handlers only check access and redirect to a signed link.
//!
//! ```text
//! GET /admin/frameworks/g-cloud-9/users
//! GET /admin/frameworks/g-cloud-9/users/accounts/download
//! GET /admin/frameworks/g-cloud-9/users/official/download
//! GET /admin/frameworks/g-cloud-9/user-research/download
//! ```

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::domain::{Error, Framework, Gate, SupplierReport};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::map_data_api_error;
use crate::inbound::http::login::redirect_to;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// A framework whose reports may be downloaded, or `not_found`.
async fn reportable_framework(state: &HttpState, slug: &str) -> ApiResult<Framework> {
    state
        .data_api
        .get_framework(slug)
        .await
        .map_err(map_data_api_error)?
        .filter(Framework::reports_available)
        .ok_or_else(|| Error::not_found(format!("no reports for framework {slug}")))
}

fn report_redirect(
    state: &HttpState,
    report: SupplierReport,
    slug: &str,
) -> ApiResult<HttpResponse> {
    let path = report.object_path(slug);
    let url = state
        .store
        .signed_url(&state.reports.bucket, &path, &state.reports.assets_url)
        .map_err(|err| {
            error!(error = %err, %path, "report link signing failed");
            Error::internal(format!("failed to sign report link: {err}"))
        })?;
    info!(framework = slug, %path, "report download");
    Ok(redirect_to(url.as_str()))
}

/// One report download on the supplier lists page.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportLink {
    pub label: String,
    pub href: String,
}

/// The supplier lists page for one framework.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SupplierListsPage {
    pub title: String,
    pub framework_slug: String,
    pub downloads: Vec<ReportLink>,
}

#[get("/admin/frameworks/{slug}/users")]
pub async fn supplier_lists(
    state: web::Data<HttpState>,
    session: SessionContext,
    slug: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_gate(Gate::FrameworkUserLists)?;
    let framework = reportable_framework(&state, &slug).await?;
    let base = format!("/admin/frameworks/{}/users", framework.slug);
    Ok(HttpResponse::Ok().json(SupplierListsPage {
        title: format!("Download supplier lists for {}", framework.name),
        downloads: vec![
            ReportLink {
                label: "Supplier user accounts".to_owned(),
                href: format!("{base}/accounts/download"),
            },
            ReportLink {
                label: "Official supplier contact details".to_owned(),
                href: format!("{base}/official/download"),
            },
        ],
        framework_slug: framework.slug,
    }))
}

#[get("/admin/frameworks/{slug}/users/accounts/download")]
pub async fn download_user_accounts(
    state: web::Data<HttpState>,
    session: SessionContext,
    slug: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_gate(Gate::FrameworkUserLists)?;
    let framework = reportable_framework(&state, &slug).await?;
    report_redirect(&state, SupplierReport::AllEmailAccounts, &framework.slug)
}

#[get("/admin/frameworks/{slug}/users/official/download")]
pub async fn download_official_details(
    state: web::Data<HttpState>,
    session: SessionContext,
    slug: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_gate(Gate::FrameworkUserLists)?;
    let framework = reportable_framework(&state, &slug).await?;
    report_redirect(&state, SupplierReport::OfficialDetails, &framework.slug)
}

/// Suppliers who agreed to take part in user research.
#[get("/admin/frameworks/{slug}/user-research/download")]
pub async fn download_user_research(
    state: web::Data<HttpState>,
    session: SessionContext,
    slug: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_gate(Gate::UserResearchDownloads)?;
    let framework = reportable_framework(&state, &slug).await?;
    report_redirect(&state, SupplierReport::UserResearch, &framework.slug)
}
