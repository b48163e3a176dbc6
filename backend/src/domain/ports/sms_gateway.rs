//! Port for handing messages to an SMS provider.

use async_trait::async_trait;

use crate::domain::OutgoingSms;

use super::define_port_error;

define_port_error! {
    /// Errors raised by SMS gateway adapters.
    pub enum SmsGatewayError {
        /// The provider could not be reached.
        Transport { message: String } =>
            "sms gateway transport failed: {message}",
        /// The provider refused the message.
        Rejected { status: u16, message: String } =>
            "sms gateway rejected message with status {status}: {message}",
    }
}

/// Port for delivering a message to a phone.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Deliver `sms`; success means the provider accepted it.
    async fn send(&self, sms: &OutgoingSms) -> Result<(), SmsGatewayError>;
}
