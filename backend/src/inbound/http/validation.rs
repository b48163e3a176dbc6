//! Shared validation helpers for inbound HTTP adapters.
//!
//! Body and query extraction failures are rewritten into the domain error
//! envelope so clients never see actix's plain-text rejections.

use actix_web::{HttpRequest, error::JsonPayloadError, error::QueryPayloadError, web};
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": "invalid_uuid",
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let error = match &err {
        JsonPayloadError::ContentType => {
            Error::invalid_request("expected an application/json request body")
        }
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            Error::invalid_request("request body too large")
        }
        other => Error::invalid_request(format!("invalid JSON body: {other}")),
    };
    error.into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid query string: {err}")).into()
}

/// JSON extractor configuration used by every API scope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(json_error_handler)
}

/// Query extractor configuration used by every API scope.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Body {
        #[allow(dead_code, reason = "only deserialisation is exercised")]
        amount: f64,
    }

    #[rstest]
    fn parse_uuid_reports_field_and_value() {
        let error = parse_uuid("nope", FieldName::new("id")).expect_err("invalid uuid");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error.details().expect("details");
        assert_eq!(details["field"], "id");
        assert_eq!(details["value"], "nope");
    }

    #[actix_web::test]
    async fn malformed_json_uses_error_envelope() {
        let app = actix_test::init_service(App::new().app_data(json_config()).route(
            "/",
            web::post().to(|_: web::Json<Body>| async { HttpResponse::Ok() }),
        ))
        .await;
        let request = actix_test::TestRequest::post()
            .uri("/")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"amount\": \"lots\"}")
            .to_request();

        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "invalid_request");
    }
}
