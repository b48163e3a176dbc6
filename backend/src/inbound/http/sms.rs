//! SMS notification handlers.
//!
//! ```text
//! GET  /api/v1/sms?search=reminder
//! POST /api/v1/sms {"recipientPhone":"0712345678","message":"Office closes early today","messageType":"general"}
//! POST /api/v1/sms/automation {"paymentReminder":false}
//! ```

use actix_web::{get, post, web};

use crate::domain::ports::SmsLog;
use crate::domain::{
    ApiResult, AutomationRules, AutomationSummary, Error, OutgoingSms, SmsInput, SmsNotification,
};
use crate::inbound::http::params::SearchParams;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// The latest 100 notifications with delivery counters.
#[utoipa::path(
    get,
    path = "/api/v1/sms",
    params(SearchParams),
    responses(
        (status = 200, description = "Notification log", body = SmsLog),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["sms"],
    operation_id = "listSms"
)]
#[get("/sms")]
pub async fn list_sms(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<SmsLog>> {
    session.require_staff()?;
    Ok(web::Json(state.sms_query.log(params.term()).await?))
}

/// Send one message.
///
/// Provider failures do not fail the request; the returned notification
/// carries status `failed` and the provider's error message.
#[utoipa::path(
    post,
    path = "/api/v1/sms",
    request_body = SmsInput,
    responses(
        (status = 200, description = "Notification in its final state", body = SmsNotification),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["sms"],
    operation_id = "sendSms"
)]
#[post("/sms")]
pub async fn send_sms(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SmsInput>,
) -> ApiResult<web::Json<SmsNotification>> {
    session.require_staff()?;
    let sms = OutgoingSms::try_from(payload.into_inner())?;
    Ok(web::Json(state.sms.send(sms).await?))
}

/// Run the automation rules once. Omitted rules default to enabled.
#[utoipa::path(
    post,
    path = "/api/v1/sms/automation",
    request_body = AutomationRules,
    responses(
        (status = 200, description = "Messages sent per rule", body = AutomationSummary),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["sms"],
    operation_id = "runAutomation"
)]
#[post("/sms/automation")]
pub async fn run_automation(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AutomationRules>,
) -> ApiResult<web::Json<AutomationSummary>> {
    session.require_staff()?;
    Ok(web::Json(state.sms.run_automation(payload.into_inner()).await?))
}
