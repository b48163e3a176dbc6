//! Payment handlers.
//!
//! ```text
//! GET  /api/v1/payments?search=MPESA123
//! POST /api/v1/payments {"riderId":"…","amount":500,"paymentDate":"2026-03-02"}
//! GET  /api/v1/payments/progress
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{
    ApiResult, Error, NewPayment, Payment, PaymentInput, PaymentProgress, PaymentRecord,
};
use crate::inbound::http::params::SearchParams;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Payments with rider details, latest payment date first.
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    params(SearchParams),
    responses(
        (status = 200, description = "Payments", body = [PaymentRecord]),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["payments"],
    operation_id = "listPayments"
)]
#[get("/payments")]
pub async fn list_payments(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<PaymentRecord>>> {
    session.require_staff()?;
    Ok(web::Json(state.payments_query.list(params.term()).await?))
}

/// Record a completed payment.
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    request_body = PaymentInput,
    responses(
        (status = 201, description = "Payment recorded", body = Payment),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Rider not found", body = Error)
    ),
    tags = ["payments"],
    operation_id = "recordPayment"
)]
#[post("/payments")]
pub async fn record_payment(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PaymentInput>,
) -> ApiResult<HttpResponse> {
    let staff = session.require_staff()?;
    let payment = NewPayment::try_from(payload.into_inner())?;
    let recorded = state.payments.record(payment, staff.staff_id).await?;
    Ok(HttpResponse::Created().json(recorded))
}

/// Repayment progress for every financed rider.
#[utoipa::path(
    get,
    path = "/api/v1/payments/progress",
    params(SearchParams),
    responses(
        (status = 200, description = "Progress per rider", body = [PaymentProgress]),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["payments"],
    operation_id = "paymentProgress"
)]
#[get("/payments/progress")]
pub async fn payment_progress(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<PaymentProgress>>> {
    session.require_staff()?;
    Ok(web::Json(state.payments_query.progress(params.term()).await?))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::{MockPaymentCommand, MockPaymentQuery};
    use crate::domain::test_support::{date, payment};
    use crate::domain::{Money, PaymentMethod, PaymentStatus, StaffRole};
    use crate::inbound::http::test_utils::{session_cookie, staff, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};
    use uuid::Uuid;

    #[actix_web::test]
    async fn record_defaults_to_mpesa_and_returns_created() {
        let rider_id = Uuid::new_v4();
        let mut command = MockPaymentCommand::new();
        command
            .expect_record()
            .withf(move |payment, _| {
                payment.rider_id == rider_id
                    && payment.payment_method == PaymentMethod::Mpesa
                    && payment.amount == Money::from_cents(50_050)
            })
            .return_once(move |_, _| {
                Ok(payment(rider_id, 500, date(2026, 3, 2), PaymentStatus::Completed))
            });
        let state = web::Data::new(HttpState {
            payments: Arc::new(command),
            ..HttpState::with_mocks()
        });
        let app = test_app!(state, record_payment);
        let cookie = session_cookie(&app, staff(StaffRole::RiderClerk)).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/payments")
                .cookie(cookie)
                .set_json(json!({
                    "riderId": rider_id,
                    "amount": 500.5,
                    "paymentDate": "2026-03-02"
                }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["status"], "completed");
    }

    #[actix_web::test]
    async fn unknown_rider_is_not_found() {
        let mut command = MockPaymentCommand::new();
        command
            .expect_record()
            .return_once(|_, _| Err(Error::not_found("rider not found")));
        let state = web::Data::new(HttpState {
            payments: Arc::new(command),
            ..HttpState::with_mocks()
        });
        let app = test_app!(state, record_payment);
        let cookie = session_cookie(&app, staff(StaffRole::RiderClerk)).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/payments")
                .cookie(cookie)
                .set_json(json!({
                    "riderId": Uuid::new_v4(),
                    "amount": 500,
                    "paymentDate": "2026-03-02",
                    "paymentMethod": "cash"
                }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn progress_is_available_to_clerks() {
        let mut query = MockPaymentQuery::new();
        query.expect_progress().return_once(|_| Ok(Vec::new()));
        let state = web::Data::new(HttpState {
            payments_query: Arc::new(query),
            ..HttpState::with_mocks()
        });
        let app = test_app!(state, payment_progress);
        let cookie = session_cookie(&app, staff(StaffRole::RiderClerk)).await;

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/payments/progress")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }
}
