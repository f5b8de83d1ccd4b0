//! The role-aware dashboard at `GET /admin`.

use actix_web::{HttpResponse, get, web};
use serde::Serialize;

use crate::domain::{Dashboard, Gate, visible_actions};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::map_data_api_error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Dashboard view model.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub title: &'static str,
    pub signed_in_as: String,
    #[serde(flatten)]
    pub dashboard: Dashboard,
}

/// Render the actions the signed-in role may take.
#[get("/admin")]
pub async fn home(state: web::Data<HttpState>, session: SessionContext) -> ApiResult<HttpResponse> {
    let user = session.require_gate(Gate::Dashboard)?;
    let frameworks = state
        .data_api
        .find_frameworks()
        .await
        .map_err(map_data_api_error)?;

    Ok(HttpResponse::Ok().json(HomePage {
        title: "Admin",
        signed_in_as: user.email_address.clone(),
        dashboard: visible_actions(user.role(), &frameworks),
    }))
}
