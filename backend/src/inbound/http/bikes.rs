//! Motorcycle inventory handlers.

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{ApiResult, Bike, BikeInput, Error, NewBike};
use crate::inbound::http::params::SearchParams;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Bikes, newest first. Search covers registration, make and chassis.
#[utoipa::path(
    get,
    path = "/api/v1/bikes",
    params(SearchParams),
    responses(
        (status = 200, description = "Bikes", body = [Bike]),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["bikes"],
    operation_id = "listBikes"
)]
#[get("/bikes")]
pub async fn list_bikes(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<Bike>>> {
    session.require_staff()?;
    Ok(web::Json(state.bikes_query.list(params.term()).await?))
}

/// Register a bike; chassis and engine numbers must be unique.
#[utoipa::path(
    post,
    path = "/api/v1/bikes",
    request_body = BikeInput,
    responses(
        (status = 201, description = "Bike registered", body = Bike),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Duplicate chassis or engine number", body = Error)
    ),
    tags = ["bikes"],
    operation_id = "registerBike"
)]
#[post("/bikes")]
pub async fn register_bike(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<BikeInput>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let bike = NewBike::try_from(payload.into_inner())?;
    let created = state.bikes.register(bike).await?;
    Ok(HttpResponse::Created().json(created))
}
