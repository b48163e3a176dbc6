//! Builder wiring Diesel repositories into HTTP state.

use std::sync::Arc;

use mockable::Clock;

use motofinance::domain::MessageTemplates;
use motofinance::domain::ports::SmsGateway;
use motofinance::inbound::http::state::{HttpState, Repositories};
use motofinance::outbound::persistence::{
    DbPool, DieselBikeRepository, DieselExpenseRepository, DieselPaymentRepository,
    DieselRiderRepository, DieselSmsRepository, DieselStaffRepository,
};

/// Build the HTTP state over Diesel repositories sharing `pool`.
pub fn build_http_state(
    pool: &DbPool,
    gateway: Arc<dyn SmsGateway>,
    signature: &str,
    clock: Arc<dyn Clock>,
) -> HttpState {
    let repos = Repositories {
        staff: Arc::new(DieselStaffRepository::new(pool.clone())),
        riders: Arc::new(DieselRiderRepository::new(pool.clone())),
        bikes: Arc::new(DieselBikeRepository::new(pool.clone())),
        payments: Arc::new(DieselPaymentRepository::new(pool.clone())),
        expenses: Arc::new(DieselExpenseRepository::new(pool.clone())),
        sms: Arc::new(DieselSmsRepository::new(pool.clone())),
    };
    HttpState::from_repositories(repos, gateway, MessageTemplates::new(signature), clock)
}
