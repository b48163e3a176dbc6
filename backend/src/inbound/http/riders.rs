//! Potential and financed rider handlers.
//!
//! ```text
//! GET  /api/v1/potential-riders?search=otieno
//! POST /api/v1/potential-riders
//! GET  /api/v1/potential-riders/{id}
//! GET  /api/v1/financed-riders?search=12345678
//! POST /api/v1/financed-riders
//! GET  /api/v1/financed-riders/{id}
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{
    ApiResult, Error, FinanceRiderInput, FinancedRider, NewFinancedRider, NewPotentialRider,
    PotentialRider, PotentialRiderInput,
};
use crate::inbound::http::params::SearchParams;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

const ID_FIELD: FieldName = FieldName::new("id");

/// Prospects, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/potential-riders",
    params(SearchParams),
    responses(
        (status = 200, description = "Potential riders", body = [PotentialRider]),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["riders"],
    operation_id = "listPotentialRiders"
)]
#[get("/potential-riders")]
pub async fn list_potential_riders(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<PotentialRider>>> {
    session.require_staff()?;
    let riders = state.riders_query.list_potential(params.term()).await?;
    Ok(web::Json(riders))
}

/// Register a prospect.
#[utoipa::path(
    post,
    path = "/api/v1/potential-riders",
    request_body = PotentialRiderInput,
    responses(
        (status = 201, description = "Prospect registered", body = PotentialRider),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["riders"],
    operation_id = "registerPotentialRider"
)]
#[post("/potential-riders")]
pub async fn register_potential_rider(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PotentialRiderInput>,
) -> ApiResult<HttpResponse> {
    let staff = session.require_staff()?;
    let rider = NewPotentialRider::try_from(payload.into_inner())?;
    let created = state
        .riders
        .register_potential(rider, staff.staff_id)
        .await?;
    Ok(HttpResponse::Created().json(created))
}

/// One prospect.
#[utoipa::path(
    get,
    path = "/api/v1/potential-riders/{id}",
    params(("id" = String, Path, description = "Potential rider id")),
    responses(
        (status = 200, description = "Potential rider", body = PotentialRider),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["riders"],
    operation_id = "getPotentialRider"
)]
#[get("/potential-riders/{id}")]
pub async fn get_potential_rider(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PotentialRider>> {
    session.require_staff()?;
    let id = parse_uuid(&path, ID_FIELD)?;
    Ok(web::Json(state.riders_query.get_potential(id).await?))
}

/// Financed riders with their bike, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/financed-riders",
    params(SearchParams),
    responses(
        (status = 200, description = "Financed riders", body = [FinancedRider]),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["riders"],
    operation_id = "listFinancedRiders"
)]
#[get("/financed-riders")]
pub async fn list_financed_riders(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<FinancedRider>>> {
    session.require_staff()?;
    let riders = state.riders_query.list_financed(params.term()).await?;
    Ok(web::Json(riders))
}

/// Finance a rider on an available bike.
///
/// Runs atomically: the rider is inserted, the bike is marked financed and
/// the prospect (when given) is marked financed, or nothing changes.
#[utoipa::path(
    post,
    path = "/api/v1/financed-riders",
    request_body = FinanceRiderInput,
    responses(
        (status = 201, description = "Rider financed", body = FinancedRider),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Bike or prospect missing", body = Error),
        (status = 409, description = "Bike unavailable or prospect already financed", body = Error)
    ),
    tags = ["riders"],
    operation_id = "financeRider"
)]
#[post("/financed-riders")]
pub async fn finance_rider(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<FinanceRiderInput>,
) -> ApiResult<HttpResponse> {
    let staff = session.require_staff()?;
    let rider = NewFinancedRider::try_from(payload.into_inner())?;
    let financed = state.riders.finance(rider, staff.staff_id).await?;
    Ok(HttpResponse::Created().json(financed))
}

/// One financed rider.
#[utoipa::path(
    get,
    path = "/api/v1/financed-riders/{id}",
    params(("id" = String, Path, description = "Financed rider id")),
    responses(
        (status = 200, description = "Financed rider", body = FinancedRider),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["riders"],
    operation_id = "getFinancedRider"
)]
#[get("/financed-riders/{id}")]
pub async fn get_financed_rider(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<FinancedRider>> {
    session.require_staff()?;
    let id = parse_uuid(&path, ID_FIELD)?;
    Ok(web::Json(state.riders_query.get_financed(id).await?))
}
