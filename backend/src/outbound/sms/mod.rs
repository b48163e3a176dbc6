//! SMS gateway adapters implementing the `SmsGateway` port.

mod http_gateway;
mod logging_gateway;

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::SmsGateway;
use crate::settings::SmsGatewaySettings;

pub use http_gateway::{HttpSmsGateway, SmsGatewayCredentials};
pub use logging_gateway::LoggingSmsGateway;

/// The HTTP gateway when provider settings exist, otherwise the logging one.
///
/// # Errors
///
/// Returns an error when the reqwest client cannot be constructed.
pub fn select_gateway(
    settings: Option<SmsGatewaySettings>,
) -> Result<Arc<dyn SmsGateway>, reqwest::Error> {
    let Some(settings) = settings else {
        warn!("MOTOFINANCE_SMS_GATEWAY_URL not set; SMS messages will only be logged");
        return Ok(Arc::new(LoggingSmsGateway));
    };
    info!(endpoint = %settings.endpoint, "using HTTP SMS gateway");
    let credentials = SmsGatewayCredentials {
        api_key: settings.api_key,
        sender_id: settings.sender_id,
    };
    let gateway = HttpSmsGateway::new(settings.endpoint, credentials, settings.timeout)?;
    Ok(Arc::new(gateway))
}
