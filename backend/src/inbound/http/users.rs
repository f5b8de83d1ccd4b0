//! User lookup and user list exports.
//!
//! ```text
//! GET /admin/users?email_address=test.user@sme.com
//! GET /admin/users/download/buyers
//! GET /admin/users/download/suppliers
//! ```

use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use url::form_urlencoded;

use crate::domain::{
    AccountAction, Error, Gate, Role, UserAccount, buyer_csv, research_frameworks,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::map_data_api_error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

pub const USER_NOT_FOUND_BANNER: &str = "Sorry, we couldn't find an account with that email address";
pub const NO_USERS: &str = "No users to show";

#[derive(Debug, Deserialize)]
pub struct FindUserQuery {
    pub email_address: Option<String>,
}

/// Link to the supplier a user belongs to.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupplierLink {
    pub name: String,
    pub href: String,
}

/// A form button acting on the account.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionForm {
    pub label: String,
    pub action: String,
    /// Page the action returns to once done.
    pub return_to: String,
}

/// One row of the lookup table.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: u64,
    pub name: String,
    pub email_address: String,
    pub role: String,
    pub supplier: Option<SupplierLink>,
    pub logged_in_at: Option<DateTime<Utc>>,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub locked: bool,
    pub active: bool,
    pub actions: Vec<ActionForm>,
}

/// The "Find a user" page.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FindUserPage {
    pub title: String,
    pub email_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_content: Option<String>,
    pub users: Vec<UserRow>,
}

impl FindUserPage {
    fn new(email_address: &str) -> Self {
        Self {
            title: "Find a user".to_owned(),
            email_address: email_address.to_owned(),
            banner: None,
            no_content: None,
            users: Vec::new(),
        }
    }

    fn not_found(email_address: &str) -> Self {
        Self {
            banner: Some(USER_NOT_FOUND_BANNER.to_owned()),
            no_content: Some(NO_USERS.to_owned()),
            ..Self::new(email_address)
        }
    }
}

fn lookup_url(email_address: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(email_address.as_bytes()).collect();
    format!("/admin/users?email_address={encoded}")
}

fn action_label(action: AccountAction) -> &'static str {
    match action {
        AccountAction::Unlock => "Unlock",
        AccountAction::Deactivate => "Deactivate",
        AccountAction::Activate => "Activate",
    }
}

impl UserRow {
    fn from_account(account: UserAccount, return_to: &str) -> Self {
        let actions = account
            .available_actions()
            .into_iter()
            .map(|action| ActionForm {
                label: action_label(action).to_owned(),
                action: format!("/admin/suppliers/users/{}/{}", account.id, action.as_str()),
                return_to: return_to.to_owned(),
            })
            .collect();
        let supplier = account.supplier.map(|supplier| SupplierLink {
            href: format!("/admin/suppliers?supplier_id={}", supplier.supplier_id),
            name: supplier.name,
        });
        Self {
            id: account.id,
            name: account.name,
            email_address: account.email_address,
            role: account.role,
            supplier,
            logged_in_at: account.logged_in_at,
            password_changed_at: account.password_changed_at,
            locked: account.locked,
            active: account.active,
            actions,
        }
    }
}

/// Look a user up by email address.
///
/// Without a query parameter the empty search page is shown. A blank or
/// unknown address answers 404 with the "not found" banner.
#[get("/admin/users")]
pub async fn find_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<FindUserQuery>,
) -> ApiResult<HttpResponse> {
    session.require_gate(Gate::FindUsers)?;
    let Some(email_address) = query.into_inner().email_address else {
        return Ok(HttpResponse::Ok().json(FindUserPage::new("")));
    };
    let email_address = email_address.trim();
    if email_address.is_empty() {
        return Ok(HttpResponse::NotFound().json(FindUserPage::not_found(email_address)));
    }

    let account = state
        .data_api
        .get_user(email_address)
        .await
        .map_err(map_data_api_error)?;
    Ok(match account {
        Some(account) => {
            let row = UserRow::from_account(account, &lookup_url(email_address));
            HttpResponse::Ok().json(FindUserPage {
                users: vec![row],
                ..FindUserPage::new(email_address)
            })
        }
        None => HttpResponse::NotFound().json(FindUserPage::not_found(email_address)),
    })
}

fn csv_attachment(filename: &str, body: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/csv; charset=utf-8"))
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename.to_owned())],
        })
        .body(body)
}

/// Download buyer accounts as CSV.
///
/// Admins get only buyers who opted in to user research; framework managers
/// get every buyer.
#[get("/admin/users/download/buyers")]
pub async fn download_buyers(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user = session.require_gate(Gate::BuyerListDownload)?;
    let research_only = user.role() == Some(Role::Admin);
    let buyers = state
        .data_api
        .find_buyer_users()
        .await
        .map_err(map_data_api_error)?;
    let body = buyer_csv(&buyers, research_only)
        .map_err(|error| Error::internal(format!("failed to write buyer CSV: {error}")))?;
    let filename = if research_only {
        "user-research-buyers.csv"
    } else {
        "all-buyers.csv"
    };
    info!(user_id = user.id, research_only, rows = buyers.len(), "buyer list exported");
    Ok(csv_attachment(filename, body))
}

/// One framework's research participant download.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadLink {
    pub label: String,
    pub href: String,
}

/// Supplier user research participant downloads.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupplierResearchPage {
    pub title: String,
    pub downloads: Vec<DownloadLink>,
}

/// List the frameworks offering supplier research participant lists.
#[get("/admin/users/download/suppliers")]
pub async fn supplier_research_downloads(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_gate(Gate::UserResearchDownloads)?;
    let frameworks = state
        .data_api
        .find_frameworks()
        .await
        .map_err(map_data_api_error)?;
    let downloads = research_frameworks(&frameworks)
        .into_iter()
        .map(|framework| DownloadLink {
            label: format!("User research participants on {}", framework.name),
            href: format!("/admin/frameworks/{}/user-research/download", framework.slug),
        })
        .collect();
    Ok(HttpResponse::Ok().json(SupplierResearchPage {
        title: "Download lists of potential user research participants".to_owned(),
        downloads,
    }))
}
