//! Staff authentication handlers.
//!
//! ```text
//! POST /api/v1/auth/sign-up {"fullName":"Jane Wanjiru","email":"jane@moto.co.ke","password":"secret1","confirmPassword":"secret1"}
//! POST /api/v1/auth/sign-in {"email":"jane@moto.co.ke","password":"secret1"}
//! POST /api/v1/auth/sign-out
//! GET  /api/v1/auth/session
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    ApiResult, Error, ErrorCode, SignInCredentials, SignUpRequest, StaffProfile, StaffSession,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Sign-up request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpBody {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Sign-in request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInBody {
    pub email: String,
    pub password: String,
}

/// Create a staff account with the `rider_clerk` role.
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-up",
    request_body = SignUpBody,
    responses(
        (status = 201, description = "Account created", body = StaffProfile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signUp",
    security([])
)]
#[post("/auth/sign-up")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    payload: web::Json<SignUpBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = SignUpRequest::try_from_parts(
        &body.full_name,
        &body.email,
        &body.password,
        &body.confirm_password,
    )?;
    let profile = state.auth.sign_up(request).await?;
    Ok(HttpResponse::Created().json(profile))
}

/// Authenticate and establish a session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-in",
    request_body = SignInBody,
    responses(
        (status = 200, description = "Signed in", body = StaffProfile,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signIn",
    security([])
)]
#[post("/auth/sign-in")]
pub async fn sign_in(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignInBody>,
) -> ApiResult<web::Json<StaffProfile>> {
    let credentials = SignInCredentials::try_from_parts(&payload.email, &payload.password)?;
    let profile = state.auth.sign_in(credentials).await?;
    session.persist_staff(&StaffSession::from(&profile))?;
    Ok(web::Json(profile))
}

/// Drop the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-out",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"],
    operation_id = "signOut",
    security([])
)]
#[post("/auth/sign-out")]
pub async fn sign_out(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Profile of the signed-in staff member.
#[utoipa::path(
    get,
    path = "/api/v1/auth/session",
    responses(
        (status = 200, description = "Signed-in profile", body = StaffProfile),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentSession"
)]
#[get("/auth/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<StaffProfile>> {
    let staff = session.require_staff()?;
    match state.auth.profile(staff.staff_id).await {
        Ok(profile) => Ok(web::Json(profile)),
        Err(error) if error.code() == ErrorCode::NotFound => {
            session.purge();
            Err(Error::unauthorized("sign in required"))
        }
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::{MockStaffAuthentication, MockStaffRepository};
    use crate::domain::{EmailAddress, StaffAuthService, StaffId, StaffRole};
    use crate::inbound::http::test_utils::{session_cookie, staff, test_app, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::Utc;
    use serde_json::{Value, json};

    fn profile(role: StaffRole) -> StaffProfile {
        StaffProfile {
            id: StaffId::random(),
            email: EmailAddress::from_stored("clerk@moto.co.ke".to_owned()),
            full_name: "Jane Wanjiru".to_owned(),
            phone: None,
            role,
            created_at: Utc::now(),
        }
    }

    fn state_with(auth: MockStaffAuthentication) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            auth: Arc::new(auth),
            ..HttpState::with_mocks()
        })
    }

    macro_rules! auth_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .wrap(test_session_middleware())
                    .app_data($state)
                    .service(
                        web::scope("/api/v1")
                            .service(sign_up)
                            .service(sign_in)
                            .service(sign_out)
                            .service(current_session),
                    ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn sign_in_sets_cookie_and_session_round_trips() {
        let signed_in = profile(StaffRole::Accountant);
        let expected = signed_in.clone();
        let lookup = signed_in.clone();
        let lookup_id = signed_in.id;
        let mut auth = MockStaffAuthentication::new();
        auth.expect_sign_in()
            .withf(|credentials| credentials.email().as_str() == "clerk@moto.co.ke")
            .times(1)
            .return_once(move |_| Ok(signed_in));
        auth.expect_profile()
            .withf(move |id| *id == lookup_id)
            .times(1)
            .return_once(move |_| Ok(lookup));
        let app = auth_app!(state_with(auth));

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/sign-in")
                .set_json(json!({"email": "Clerk@Moto.co.ke", "password": "secret1"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();

        let session = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/auth/session")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(session.status(), StatusCode::OK);
        let body: Value = test::read_body_json(session).await;
        assert_eq!(body["role"], "accountant");
        assert_eq!(body["id"], json!(expected.id));
    }

    #[actix_web::test]
    async fn invalid_sign_in_body_names_the_field() {
        let app = auth_app!(state_with(MockStaffAuthentication::new()));

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/sign-in")
                .set_json(json!({"email": "clerk@moto.co.ke", "password": "123"}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], "password");
    }

    #[actix_web::test]
    async fn wrong_credentials_are_unauthorised() {
        let mut auth = MockStaffAuthentication::new();
        auth.expect_sign_in()
            .return_once(|_| Err(Error::unauthorized("invalid credentials")));
        let app = auth_app!(state_with(auth));

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/sign-in")
                .set_json(json!({"email": "clerk@moto.co.ke", "password": "wrong-pass"}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.response().cookies().next().is_none());
    }

    #[actix_web::test]
    async fn sign_up_returns_created_profile() {
        let mut auth = MockStaffAuthentication::new();
        auth.expect_sign_up()
            .withf(|request| request.full_name() == "Jane Wanjiru")
            .return_once(|_| Ok(profile(StaffRole::RiderClerk)));
        let app = auth_app!(state_with(auth));

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/sign-up")
                .set_json(json!({
                    "fullName": "Jane Wanjiru",
                    "email": "jane@moto.co.ke",
                    "password": "secret1",
                    "confirmPassword": "secret1"
                }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["role"], "rider_clerk");
    }

    #[actix_web::test]
    async fn session_without_cookie_is_unauthorised() {
        let app = auth_app!(state_with(MockStaffAuthentication::new()));

        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/auth/session").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["code"], "unauthorized");
    }

    #[actix_web::test]
    async fn sign_out_is_public() {
        let app = auth_app!(state_with(MockStaffAuthentication::new()));

        let response = test::call_service(
            &app,
            test::TestRequest::post().uri("/api/v1/auth/sign-out").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn session_for_removed_account_is_purged() {
        let mut repo = MockStaffRepository::new();
        repo.expect_find_by_id().times(1).return_once(|_| Ok(None));
        let state = web::Data::new(HttpState {
            auth: Arc::new(StaffAuthService::new(Arc::new(repo))),
            ..HttpState::with_mocks()
        });
        let app = test_app!(state, current_session);
        let cookie = session_cookie(&app, staff(StaffRole::RiderClerk)).await;

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/auth/session")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let removal = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie cleared");
        assert!(removal.value().is_empty());
    }
}
