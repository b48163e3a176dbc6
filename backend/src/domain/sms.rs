//! SMS notifications: message types, templates and the automation rules.

use std::str::FromStr;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::contact::KenyanPhone;
use super::money::Money;
use super::rider::UnknownVariant;
use super::validation::{self, Field, FieldViolation};

/// Days a rider must operate before owning the motorcycle outright.
pub const OWNERSHIP_PERIOD_DAYS: u64 = 366;
/// Days without a completed payment before a reminder is sent.
pub const REMINDER_GRACE_DAYS: u64 = 2;
/// Number of notifications returned by the SMS log.
pub const RECENT_SMS_LIMIT: i64 = 100;

/// Delivery state of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SmsStatus {
    Pending,
    Sent,
    Failed,
}

impl SmsStatus {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for SmsStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            other => Err(UnknownVariant::new("sms status", other)),
        }
    }
}

/// Purpose of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SmsMessageType {
    #[default]
    Manual,
    PaymentConfirmation,
    PaymentReminder,
    LatePaymentWarning,
    OwnershipCongratulations,
    Welcome,
    Warning,
    General,
}

impl SmsMessageType {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::PaymentConfirmation => "payment_confirmation",
            Self::PaymentReminder => "payment_reminder",
            Self::LatePaymentWarning => "late_payment_warning",
            Self::OwnershipCongratulations => "ownership_congratulations",
            Self::Welcome => "welcome",
            Self::Warning => "warning",
            Self::General => "general",
        }
    }
}

impl FromStr for SmsMessageType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "manual" => Ok(Self::Manual),
            "payment_confirmation" => Ok(Self::PaymentConfirmation),
            "payment_reminder" => Ok(Self::PaymentReminder),
            "late_payment_warning" => Ok(Self::LatePaymentWarning),
            "ownership_congratulations" => Ok(Self::OwnershipCongratulations),
            "welcome" => Ok(Self::Welcome),
            "warning" => Ok(Self::Warning),
            "general" => Ok(Self::General),
            other => Err(UnknownVariant::new("sms message type", other)),
        }
    }
}

/// A logged notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SmsNotification {
    pub id: Uuid,
    pub rider_id: Option<Uuid>,
    #[schema(value_type = String)]
    pub recipient_phone: KenyanPhone,
    pub message: String,
    pub message_type: SmsMessageType,
    pub status: SmsStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A message about to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingSms {
    pub rider_id: Option<Uuid>,
    pub recipient: KenyanPhone,
    pub message: String,
    pub message_type: SmsMessageType,
}

/// Form submitted to send a message by hand.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SmsInput {
    pub rider_id: Option<Uuid>,
    pub recipient_phone: String,
    pub message: String,
    #[serde(default)]
    pub message_type: SmsMessageType,
}

const RECIPIENT_PHONE: Field = Field::new("recipientPhone", "Recipient phone");
const MESSAGE: Field = Field::new("message", "Message");

impl TryFrom<SmsInput> for OutgoingSms {
    type Error = FieldViolation;

    fn try_from(input: SmsInput) -> Result<Self, Self::Error> {
        Ok(Self {
            rider_id: input.rider_id,
            recipient: KenyanPhone::parse(RECIPIENT_PHONE, &input.recipient_phone)?,
            message: validation::text(MESSAGE, &input.message, 10, 160)?,
            message_type: input.message_type,
        })
    }
}

/// Delivery counters over a set of notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SmsStats {
    pub total: usize,
    pub sent: usize,
    pub pending: usize,
    pub failed: usize,
    pub delivery_rate: f64,
}

impl SmsStats {
    /// Count notifications by status.
    pub fn compute(notifications: &[SmsNotification]) -> Self {
        let count = |status: SmsStatus| {
            notifications
                .iter()
                .filter(|notification| notification.status == status)
                .count()
        };
        let total = notifications.len();
        let sent = count(SmsStatus::Sent);
        let delivery_rate = if total == 0 {
            0.0
        } else {
            sent as f64 / total as f64 * 100.0
        };
        Self {
            total,
            sent,
            pending: count(SmsStatus::Pending),
            failed: count(SmsStatus::Failed),
            delivery_rate,
        }
    }
}

/// Automated message wording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplates {
    signature: String,
}

impl MessageTemplates {
    /// Templates signed with `signature`.
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
        }
    }

    /// Acknowledge a received payment.
    pub fn payment_confirmation(&self, name: &str, amount: Money) -> String {
        format!(
            "Dear {name}, your payment of KES {amount} has been received. Thank you! - {}",
            self.signature
        )
    }

    /// Remind a rider that today's remittance is due.
    pub fn payment_reminder(&self, name: &str, daily_remittance: Money) -> String {
        format!(
            "Dear {name}, this is a reminder that your daily remittance of KES {daily_remittance} \
             is due before 9PM today. Please make your payment. - {}",
            self.signature
        )
    }

    /// Congratulate a rider who completed the ownership period.
    pub fn ownership_congratulations(&self, name: &str) -> String {
        format!(
            "Congratulations {name}! You have successfully completed your \
             {OWNERSHIP_PERIOD_DAYS}-day payment period and now fully own your motorcycle. \
             Thank you for your commitment! - {}",
            self.signature
        )
    }
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self::new("MotoFinance")
    }
}

/// Which automation rules to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AutomationRules {
    pub payment_confirmation: bool,
    pub payment_reminder: bool,
    pub ownership_congratulations: bool,
}

impl Default for AutomationRules {
    fn default() -> Self {
        Self {
            payment_confirmation: true,
            payment_reminder: true,
            ownership_congratulations: true,
        }
    }
}

/// Outcome of one rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuleOutcome {
    pub sent: usize,
    pub failed: usize,
}

impl RuleOutcome {
    /// Record one dispatch result.
    pub fn record(&mut self, status: SmsStatus) {
        match status {
            SmsStatus::Sent | SmsStatus::Pending => self.sent += 1,
            SmsStatus::Failed => self.failed += 1,
        }
    }
}

/// Per-rule outcomes of an automation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AutomationSummary {
    pub payment_confirmation: RuleOutcome,
    pub payment_reminder: RuleOutcome,
    pub ownership_congratulations: RuleOutcome,
}

/// A reminder is due when no completed payment landed in the grace window.
pub fn reminder_due(last_payment: Option<NaiveDate>, today: NaiveDate) -> bool {
    match (last_payment, today.checked_sub_days(Days::new(REMINDER_GRACE_DAYS))) {
        (None, _) => true,
        (Some(last), Some(cutoff)) => last < cutoff,
        (Some(_), None) => false,
    }
}

/// Ownership is reached exactly [`OWNERSHIP_PERIOD_DAYS`] after the start date.
pub fn ownership_due(start_date: NaiveDate, today: NaiveDate) -> bool {
    today
        .checked_sub_days(Days::new(OWNERSHIP_PERIOD_DAYS))
        .is_some_and(|anniversary| anniversary == start_date)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some(date(2026, 10, 16)), false)]
    #[case(Some(date(2026, 10, 14)), false)]
    #[case(Some(date(2026, 10, 13)), true)]
    fn reminder_window(#[case] last: Option<NaiveDate>, #[case] due: bool) {
        assert_eq!(reminder_due(last, date(2026, 10, 16)), due);
    }

    #[rstest]
    #[case(date(2025, 10, 15), true)]
    #[case(date(2025, 10, 16), false)]
    #[case(date(2025, 10, 14), false)]
    fn ownership_anniversary(#[case] start: NaiveDate, #[case] due: bool) {
        assert_eq!(ownership_due(start, date(2026, 10, 16)), due);
    }

    #[rstest]
    fn templates_format_amounts_and_signature() {
        let templates = MessageTemplates::default();
        assert_eq!(
            templates.payment_confirmation("Amina", Money::from_whole_shillings(1_500)),
            "Dear Amina, your payment of KES 1,500 has been received. Thank you! - MotoFinance"
        );
        assert_eq!(
            templates.payment_reminder("Amina", Money::from_whole_shillings(350)),
            "Dear Amina, this is a reminder that your daily remittance of KES 350 is due \
             before 9PM today. Please make your payment. - MotoFinance"
        );
        assert!(
            MessageTemplates::new("Boda Co")
                .ownership_congratulations("Amina")
                .ends_with("366-day payment period and now fully own your motorcycle. \
                            Thank you for your commitment! - Boda Co")
        );
    }

    #[rstest]
    #[case("too short")]
    #[case("")]
    fn manual_message_requires_ten_characters(#[case] message: &str) {
        let input = SmsInput {
            rider_id: None,
            recipient_phone: "0712345678".to_owned(),
            message: message.to_owned(),
            message_type: SmsMessageType::Manual,
        };
        assert_eq!(OutgoingSms::try_from(input).expect_err("rejected").field(), "message");
    }

    #[rstest]
    fn manual_message_caps_at_one_sms() {
        let input = SmsInput {
            rider_id: None,
            recipient_phone: "0712345678".to_owned(),
            message: "x".repeat(161),
            message_type: SmsMessageType::General,
        };
        assert!(OutgoingSms::try_from(input).is_err());
    }

    #[rstest]
    fn automation_rules_default_to_enabled_when_omitted() {
        let rules: AutomationRules =
            serde_json::from_value(serde_json::json!({"paymentReminder": false}))
                .expect("deserialise");
        assert!(rules.payment_confirmation);
        assert!(!rules.payment_reminder);
        assert!(rules.ownership_congratulations);
    }

    #[rstest]
    fn stats_report_delivery_rate() {
        let make = |status| SmsNotification {
            id: Uuid::new_v4(),
            rider_id: None,
            recipient_phone: KenyanPhone::from_stored("0712345678".to_owned()),
            message: "hello there".to_owned(),
            message_type: SmsMessageType::Manual,
            status,
            sent_at: None,
            error_message: None,
            created_at: Utc::now(),
        };
        let log = vec![
            make(SmsStatus::Sent),
            make(SmsStatus::Sent),
            make(SmsStatus::Failed),
            make(SmsStatus::Pending),
        ];
        let stats = SmsStats::compute(&log);
        assert_eq!(stats.sent, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.delivery_rate, 50.0);
        assert_eq!(SmsStats::compute(&[]).delivery_rate, 0.0);
    }
}
