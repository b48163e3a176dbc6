//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod bikes;
pub mod error;
pub mod expenses;
pub mod health;
pub mod params;
pub mod payments;
pub mod reports;
pub mod riders;
pub mod session;
pub mod session_config;
pub mod sms;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

/// Register every `/api/v1` handler on `cfg`.
///
/// Callers wrap the scope with the session middleware and provide
/// [`state::HttpState`] as app data.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .app_data(validation::query_config())
        .service(auth::sign_up)
        .service(auth::sign_in)
        .service(auth::sign_out)
        .service(auth::current_session)
        .service(riders::list_potential_riders)
        .service(riders::register_potential_rider)
        .service(riders::get_potential_rider)
        .service(riders::list_financed_riders)
        .service(riders::finance_rider)
        .service(riders::get_financed_rider)
        .service(bikes::list_bikes)
        .service(bikes::register_bike)
        .service(payments::payment_progress)
        .service(payments::list_payments)
        .service(payments::record_payment)
        .service(expenses::profit_analysis)
        .service(expenses::list_expenses)
        .service(expenses::record_expense)
        .service(reports::dashboard)
        .service(reports::annual_report)
        .service(sms::run_automation)
        .service(sms::list_sms)
        .service(sms::send_sms);
}
