//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler plus the health probes and
//! describes the session cookie security scheme. The document is served by
//! Swagger UI in debug builds and printed by the `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/sign-in.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "MotoFinance API",
        description = "Staff-facing API for motorcycle financing: riders, bikes, payments, \
                       expenses, reports and SMS notifications."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::sign_up,
        crate::inbound::http::auth::sign_in,
        crate::inbound::http::auth::sign_out,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::riders::list_potential_riders,
        crate::inbound::http::riders::register_potential_rider,
        crate::inbound::http::riders::get_potential_rider,
        crate::inbound::http::riders::list_financed_riders,
        crate::inbound::http::riders::finance_rider,
        crate::inbound::http::riders::get_financed_rider,
        crate::inbound::http::bikes::list_bikes,
        crate::inbound::http::bikes::register_bike,
        crate::inbound::http::payments::list_payments,
        crate::inbound::http::payments::record_payment,
        crate::inbound::http::payments::payment_progress,
        crate::inbound::http::expenses::list_expenses,
        crate::inbound::http::expenses::record_expense,
        crate::inbound::http::expenses::profit_analysis,
        crate::inbound::http::reports::dashboard,
        crate::inbound::http::reports::annual_report,
        crate::inbound::http::sms::list_sms,
        crate::inbound::http::sms::send_sms,
        crate::inbound::http::sms::run_automation,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(Error, ErrorCode)),
    tags(
        (name = "auth", description = "Staff sign-up, sign-in and session"),
        (name = "riders", description = "Potential and financed riders"),
        (name = "bikes", description = "Motorcycle inventory"),
        (name = "payments", description = "Rider payments and repayment progress"),
        (name = "expenses", description = "Company expenses and profit analysis"),
        (name = "reports", description = "Dashboard and annual reports"),
        (name = "sms", description = "SMS notifications and automation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
