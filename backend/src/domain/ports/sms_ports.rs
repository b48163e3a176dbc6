//! Driving ports for SMS notifications.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AutomationRules, AutomationSummary, Error, OutgoingSms, SearchTerm, SmsNotification, SmsStats,
};

/// Recent notifications and delivery counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SmsLog {
    pub notifications: Vec<SmsNotification>,
    pub stats: SmsStats,
}

/// SMS mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SmsCommand: Send + Sync {
    /// Dispatch one message and return its logged state.
    async fn send(&self, sms: OutgoingSms) -> Result<SmsNotification, Error>;

    /// Run the enabled automation rules once.
    async fn run_automation(&self, rules: AutomationRules) -> Result<AutomationSummary, Error>;
}

/// SMS reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SmsQuery: Send + Sync {
    /// Recent notifications matching `search`; stats cover the whole recent
    /// log.
    async fn log(&self, search: SearchTerm) -> Result<SmsLog, Error>;
}
