//! Port for the SMS notification log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{OutgoingSms, SmsMessageType, SmsNotification};

use super::define_port_error;

define_port_error! {
    /// Errors raised by SMS log adapters.
    pub enum SmsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "sms repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "sms repository query failed: {message}",
        /// The notification to update does not exist.
        NotFound { id: Uuid } =>
            "sms notification {id} not found",
    }
}

/// Port for reading and writing notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SmsRepository: Send + Sync {
    /// Log a message as `pending` before dispatch.
    async fn insert_pending(&self, sms: &OutgoingSms) -> Result<SmsNotification, SmsRepositoryError>;

    /// Mark a notification as delivered to the gateway.
    async fn mark_sent(
        &self,
        id: &Uuid,
        sent_at: DateTime<Utc>,
    ) -> Result<SmsNotification, SmsRepositoryError>;

    /// Mark a notification as failed with the gateway's reason.
    async fn mark_failed(
        &self,
        id: &Uuid,
        error_message: &str,
    ) -> Result<SmsNotification, SmsRepositoryError>;

    /// Latest notifications, newest first.
    async fn list_recent(&self, limit: i64) -> Result<Vec<SmsNotification>, SmsRepositoryError>;

    /// Whether `rider_id` already has a `message_type` notification in any
    /// status, optionally only counting those created at or after `since`.
    async fn has_received(
        &self,
        rider_id: &Uuid,
        message_type: SmsMessageType,
        since: Option<DateTime<Utc>>,
    ) -> Result<bool, SmsRepositoryError>;
}
