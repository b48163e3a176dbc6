//! Dashboard and annual report handlers.

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{AnnualReport, ApiResult, DashboardStats, Error};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Query parameters for `GET /reports/annual`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnnualReportParams {
    /// Calendar year between 2020 and next year.
    pub year: i32,
}

/// Headline counters. Any signed-in staff member.
#[utoipa::path(
    get,
    path = "/api/v1/reports/dashboard",
    responses(
        (status = 200, description = "Dashboard counters", body = DashboardStats),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["reports"],
    operation_id = "dashboard"
)]
#[get("/reports/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardStats>> {
    session.require_staff()?;
    Ok(web::Json(state.reports.dashboard().await?))
}

/// Profit and loss for one year, broken down by month.
#[utoipa::path(
    get,
    path = "/api/v1/reports/annual",
    params(AnnualReportParams),
    responses(
        (status = 200, description = "Annual report", body = AnnualReport),
        (status = 400, description = "Year out of range", body = Error),
        (status = 403, description = "Finance role required", body = Error)
    ),
    tags = ["reports"],
    operation_id = "annualReport"
)]
#[get("/reports/annual")]
pub async fn annual_report(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<AnnualReportParams>,
) -> ApiResult<web::Json<AnnualReport>> {
    session.require_finance()?;
    Ok(web::Json(state.reports.annual(params.year).await?))
}
