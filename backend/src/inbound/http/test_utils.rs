//! Test helpers for inbound HTTP components.

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};

use crate::domain::{ApiResult, StaffId, StaffRole, StaffSession};
use crate::inbound::http::session::SessionContext;

const SIGN_IN_PATH: &str = "/__test/sign-in";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// A fresh staff session with the given role.
pub fn staff(role: StaffRole) -> StaffSession {
    StaffSession {
        staff_id: StaffId::random(),
        role,
    }
}

async fn sign_in(session: SessionContext, payload: web::Json<StaffSession>) -> ApiResult<HttpResponse> {
    session.persist_staff(&payload)?;
    Ok(HttpResponse::Ok().finish())
}

/// Register a route that stores the posted [`StaffSession`] in the cookie.
pub fn sign_in_route(cfg: &mut web::ServiceConfig) {
    cfg.route(SIGN_IN_PATH, web::post().to(sign_in));
}

/// Sign `staff` in through [`sign_in_route`] and return the session cookie.
pub async fn session_cookie<S, B>(app: &S, staff: StaffSession) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri(SIGN_IN_PATH)
            .set_json(&staff)
            .to_request(),
    )
    .await;
    assert!(response.status().is_success(), "test sign-in failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Initialise an app with the test session middleware, the extractor
/// configs, the test sign-in route and the given services under `/api/v1`.
macro_rules! test_app {
    ($state:expr, $($service:expr),+ $(,)?) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap($crate::inbound::http::test_utils::test_session_middleware())
                .app_data($crate::inbound::http::validation::json_config())
                .app_data($crate::inbound::http::validation::query_config())
                .app_data($state)
                .configure($crate::inbound::http::test_utils::sign_in_route)
                .service(actix_web::web::scope("/api/v1")$(.service($service))+),
        )
        .await
    };
}
pub(crate) use test_app;
