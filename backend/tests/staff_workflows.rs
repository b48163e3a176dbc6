//! End-to-end behaviour of the REST API over in-memory repositories.
//!
//! Requests flow through the real handlers, session middleware and domain
//! services; only persistence and the SMS provider are replaced.

mod support;

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::Utc;
use motofinance::Trace;
use motofinance::domain::StaffRole;
use motofinance::inbound::http::api_routes;
use rstest::rstest;
use serde_json::{Value, json};

use support::{in_memory_state, session_middleware};

const PASSWORD: &str = "correct-horse-battery";

fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie issued")
}

async fn sign_in<S>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/sign-in")
            .set_json(json!({"email": email, "password": PASSWORD}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response)
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .wrap(Trace)
                .service(
                    web::scope("/api/v1")
                        .wrap(session_middleware())
                        .configure(api_routes),
                ),
        )
        .await
    };
}

#[actix_web::test]
async fn sign_up_then_sign_in_establishes_a_session() {
    let (state, _staff) = in_memory_state();
    let app = app!(state);

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/sign-up")
            .set_json(json!({
                "fullName": "Grace Njeri",
                "email": "Grace@MotoFinance.co.ke",
                "password": PASSWORD,
                "confirmPassword": PASSWORD
            }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let profile: Value = test::read_body_json(created).await;
    assert_eq!(profile["role"], "rider_clerk");
    assert_eq!(profile["email"], "grace@motofinance.co.ke");

    let cookie = sign_in(&app, "grace@motofinance.co.ke").await;
    let current = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/auth/session")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(current.status(), StatusCode::OK);
    let body: Value = test::read_body_json(current).await;
    assert_eq!(body["fullName"], "Grace Njeri");

    let signed_out = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/sign-out")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(signed_out.status(), StatusCode::NO_CONTENT);
    let cleared = session_cookie(&signed_out);

    let after = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/auth/session")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn duplicate_sign_up_conflicts() {
    let (state, staff) = in_memory_state();
    staff.seed("taken@motofinance.co.ke", PASSWORD, StaffRole::Admin);
    let app = app!(state);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/sign-up")
            .set_json(json!({
                "fullName": "Second Person",
                "email": "taken@motofinance.co.ke",
                "password": PASSWORD,
                "confirmPassword": PASSWORD
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[rstest]
#[case("unknown@motofinance.co.ke", PASSWORD)]
#[case("clerk@motofinance.co.ke", "wrong-password-entirely")]
#[actix_web::test]
async fn bad_credentials_are_indistinguishable(#[case] email: &str, #[case] password: &str) {
    let (state, staff) = in_memory_state();
    staff.seed("clerk@motofinance.co.ke", PASSWORD, StaffRole::RiderClerk);
    let app = app!(state);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/sign-in")
            .set_json(json!({"email": email, "password": password}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "invalid credentials");
}

#[actix_web::test]
async fn finance_endpoints_are_gated_by_role() {
    let (state, staff) = in_memory_state();
    staff.seed("clerk@motofinance.co.ke", PASSWORD, StaffRole::RiderClerk);
    staff.seed("books@motofinance.co.ke", PASSWORD, StaffRole::Accountant);
    let app = app!(state);

    let clerk = sign_in(&app, "clerk@motofinance.co.ke").await;
    let denied = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/expenses")
            .cookie(clerk)
            .to_request(),
    )
    .await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let accountant = sign_in(&app, "books@motofinance.co.ke").await;
    let today = Utc::now().date_naive().to_string();
    let recorded = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/expenses")
            .cookie(accountant.clone())
            .set_json(json!({
                "category": "fuel",
                "description": "Fuel for the service van",
                "amount": 2500.5,
                "expenseDate": today
            }))
            .to_request(),
    )
    .await;
    assert_eq!(recorded.status(), StatusCode::CREATED);

    let listing = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/expenses")
            .cookie(accountant)
            .to_request(),
    )
    .await;
    assert_eq!(listing.status(), StatusCode::OK);
    let body: Value = test::read_body_json(listing).await;
    assert_eq!(body["expenses"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["total"], 2500.5);
}

#[actix_web::test]
async fn registered_records_reach_the_dashboard() {
    let (state, staff) = in_memory_state();
    staff.seed("clerk@motofinance.co.ke", PASSWORD, StaffRole::RiderClerk);
    let app = app!(state);
    let cookie = sign_in(&app, "clerk@motofinance.co.ke").await;

    let bike = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/bikes")
            .cookie(cookie.clone())
            .set_json(json!({
                "make": "Boxer BM150",
                "chassisNo": "MD2A11CZ5NWA12345",
                "engineNo": "DUZWNA12345",
                "colour": "Red",
                "purchaseDate": "2024-03-01",
                "purchasePrice": 145000.0
            }))
            .to_request(),
    )
    .await;
    assert_eq!(bike.status(), StatusCode::CREATED);

    let prospect = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/potential-riders")
            .cookie(cookie.clone())
            .set_json(json!({
                "fullName": "Peter Otieno",
                "idNumber": "12345678",
                "age": 27,
                "postalAddress": "P.O. Box 42, Kisumu",
                "primaryPhone": "0712345678"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(prospect.status(), StatusCode::CREATED);

    let dashboard = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/reports/dashboard")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(dashboard.status(), StatusCode::OK);
    let stats: Value = test::read_body_json(dashboard).await;
    assert_eq!(stats["bikes"], 1);
    assert_eq!(stats["potentialRiders"], 1);
    assert_eq!(stats["financedRiders"], 0);
}

#[actix_web::test]
async fn manual_sms_is_logged_and_counted() {
    let (state, staff) = in_memory_state();
    staff.seed("clerk@motofinance.co.ke", PASSWORD, StaffRole::RiderClerk);
    let app = app!(state);
    let cookie = sign_in(&app, "clerk@motofinance.co.ke").await;

    let sent = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/sms")
            .cookie(cookie.clone())
            .set_json(json!({
                "recipientPhone": "0712345678",
                "message": "Office closes early today"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(sent.status(), StatusCode::OK);
    let notification: Value = test::read_body_json(sent).await;
    assert_eq!(notification["status"], "sent");

    let log = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/sms")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(log).await;
    assert_eq!(body["stats"]["total"], 1);
    assert_eq!(body["stats"]["sent"], 1);
}
