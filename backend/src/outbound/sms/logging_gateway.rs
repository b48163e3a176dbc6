//! Gateway used when no SMS provider is configured.
//!
//! Messages are written to the log and reported as delivered, which keeps
//! the notification log usable in development.

use async_trait::async_trait;
use tracing::info;

use crate::domain::OutgoingSms;
use crate::domain::ports::{SmsGateway, SmsGatewayError};

/// Gateway that logs each message instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSmsGateway;

#[async_trait]
impl SmsGateway for LoggingSmsGateway {
    async fn send(&self, sms: &OutgoingSms) -> Result<(), SmsGatewayError> {
        info!(
            to = sms.recipient.as_str(),
            message_type = sms.message_type.as_str(),
            length = sms.message.chars().count(),
            "sms provider not configured; message logged only"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{KenyanPhone, SmsMessageType};

    #[tokio::test]
    async fn always_accepts() {
        let sms = OutgoingSms {
            rider_id: None,
            recipient: KenyanPhone::from_stored("0712345678".to_owned()),
            message: "Hello from the office".to_owned(),
            message_type: SmsMessageType::Manual,
        };
        assert!(LoggingSmsGateway.send(&sms).await.is_ok());
    }
}
