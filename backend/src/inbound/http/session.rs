//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie carries a [`StaffSession`] (staff id and role). Handlers call
//! [`SessionContext::require_staff`] or [`SessionContext::require_finance`]
//! before touching any port.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, StaffSession};

pub(crate) const STAFF_KEY: &str = "staff";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the signed-in staff member, rotating the session id.
    pub fn persist_staff(&self, staff: &StaffSession) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(STAFF_KEY, staff)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The signed-in staff member, if any.
    ///
    /// A cookie that no longer decodes is treated as signed out.
    pub fn staff(&self) -> Option<StaffSession> {
        match self.0.get::<StaffSession>(STAFF_KEY) {
            Ok(staff) => staff,
            Err(error) => {
                warn!(%error, "discarding unreadable staff session");
                None
            }
        }
    }

    /// Require a signed-in staff member or return `401 Unauthorized`.
    pub fn require_staff(&self) -> Result<StaffSession, Error> {
        self.staff()
            .ok_or_else(|| Error::unauthorized("sign in required"))
    }

    /// Require an admin or accountant, returning `401` when signed out and
    /// `403` for other roles.
    pub fn require_finance(&self) -> Result<StaffSession, Error> {
        let staff = self.require_staff()?;
        if staff.role.can_view_finances() {
            Ok(staff)
        } else {
            Err(Error::forbidden("finance role required"))
        }
    }

    /// Drop the session cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::StaffRole;
    use crate::inbound::http::test_utils::{
        session_cookie, sign_in_route, staff, test_session_middleware,
    };
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    async fn require_finance(session: SessionContext) -> Result<HttpResponse, Error> {
        session.require_finance()?;
        Ok(HttpResponse::Ok().finish())
    }

    #[rstest]
    #[case(StaffRole::Admin, StatusCode::OK)]
    #[case(StaffRole::Accountant, StatusCode::OK)]
    #[case(StaffRole::RiderClerk, StatusCode::FORBIDDEN)]
    #[actix_web::test]
    async fn finance_gate_checks_role(#[case] role: StaffRole, #[case] expected: StatusCode) {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/finance", web::get().to(require_finance))
                .configure(sign_in_route),
        )
        .await;

        let cookie = session_cookie(&app, staff(role)).await;
        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/finance")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), expected);
    }

    #[actix_web::test]
    async fn missing_session_is_unauthorised() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/finance", web::get().to(require_finance)),
        )
        .await;

        let response =
            test::call_service(&app, test::TestRequest::get().uri("/finance").to_request()).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn tampered_session_value_is_signed_out() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(STAFF_KEY, "not-a-session")
                            .expect("insert raw value");
                        HttpResponse::Ok()
                    }),
                )
                .route("/finance", web::get().to(require_finance)),
        )
        .await;

        let set = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = set
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();
        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/finance")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
