//! SMS dispatch and automation service.
//!
//! Every message is logged as `pending` before the gateway call and then
//! updated by id to `sent` or `failed`. Gateway failures never abort a
//! request; repository failures do.
//!
//! Automation rules are idempotent within a day: a rider receives at most
//! one confirmation and one reminder per UTC day, and one ownership message
//! ever.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use mockable::Clock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    PaymentRepository, PaymentRepositoryError, RiderRepository, RiderRepositoryError, SmsCommand,
    SmsGateway, SmsLog, SmsQuery, SmsRepository, SmsRepositoryError,
};
use crate::domain::sms::{RECENT_SMS_LIMIT, ownership_due, reminder_due};
use crate::domain::{
    AutomationRules, AutomationSummary, Error, FinancedRider, MessageTemplates, OutgoingSms,
    PaymentFilter, RiderStatus, RuleOutcome, SearchTerm, SmsMessageType, SmsNotification,
    SmsStats,
};

/// SMS service implementing [`SmsCommand`] and [`SmsQuery`].
pub struct SmsService<S, G: ?Sized, R, P> {
    log: Arc<S>,
    gateway: Arc<G>,
    riders: Arc<R>,
    payments: Arc<P>,
    templates: MessageTemplates,
    clock: Arc<dyn Clock>,
}

impl<S, G: ?Sized, R, P> SmsService<S, G, R, P> {
    /// Create a new service signing automated messages with the default
    /// signature.
    pub fn new(
        log: Arc<S>,
        gateway: Arc<G>,
        riders: Arc<R>,
        payments: Arc<P>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            log,
            gateway,
            riders,
            payments,
            templates: MessageTemplates::default(),
            clock,
        }
    }

    /// Replace the automated message templates.
    #[must_use]
    pub fn with_templates(mut self, templates: MessageTemplates) -> Self {
        self.templates = templates;
        self
    }
}

fn map_sms_error(error: SmsRepositoryError) -> Error {
    match error {
        SmsRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("sms repository unavailable: {message}"))
        }
        other => Error::internal(format!("sms repository error: {other}")),
    }
}

fn map_rider_error(error: RiderRepositoryError) -> Error {
    match error {
        RiderRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("rider repository unavailable: {message}"))
        }
        other => Error::internal(format!("rider repository error: {other}")),
    }
}

fn map_payment_error(error: PaymentRepositoryError) -> Error {
    match error {
        PaymentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("payment repository unavailable: {message}"))
        }
        PaymentRepositoryError::Query { message } => {
            Error::internal(format!("payment repository error: {message}"))
        }
    }
}

fn start_of_day(today: NaiveDate) -> DateTime<Utc> {
    today.and_time(NaiveTime::MIN).and_utc()
}

fn to_rider(rider: &FinancedRider, message: String, message_type: SmsMessageType) -> OutgoingSms {
    OutgoingSms {
        rider_id: Some(rider.id),
        recipient: rider.identity.primary_phone.clone(),
        message,
        message_type,
    }
}

impl<S, G: ?Sized, R, P> SmsService<S, G, R, P>
where
    S: SmsRepository,
    G: SmsGateway,
    R: RiderRepository,
    P: PaymentRepository,
{
    async fn dispatch(&self, sms: &OutgoingSms) -> Result<SmsNotification, Error> {
        let pending = self.log.insert_pending(sms).await.map_err(map_sms_error)?;
        match self.gateway.send(sms).await {
            Ok(()) => {
                debug!(notification_id = %pending.id, "sms accepted by gateway");
                self.log
                    .mark_sent(&pending.id, self.clock.utc())
                    .await
                    .map_err(map_sms_error)
            }
            Err(error) => {
                warn!(notification_id = %pending.id, error = %error, "sms dispatch failed");
                self.log
                    .mark_failed(&pending.id, &error.to_string())
                    .await
                    .map_err(map_sms_error)
            }
        }
    }

    async fn already_sent(
        &self,
        rider_id: &Uuid,
        message_type: SmsMessageType,
        since: Option<DateTime<Utc>>,
    ) -> Result<bool, Error> {
        self.log
            .has_received(rider_id, message_type, since)
            .await
            .map_err(map_sms_error)
    }

    async fn active_riders(&self) -> Result<Vec<FinancedRider>, Error> {
        self.riders
            .list_financed(Some(RiderStatus::Financed))
            .await
            .map_err(map_rider_error)
    }

    async fn confirm_payments(&self, today: NaiveDate) -> Result<RuleOutcome, Error> {
        let records = self
            .payments
            .list(&PaymentFilter::completed().between(today, today))
            .await
            .map_err(map_payment_error)?;
        let since = Some(start_of_day(today));
        let mut confirmed = HashSet::new();
        let mut outcome = RuleOutcome::default();

        for record in records {
            let rider_id = record.payment.rider_id;
            if !confirmed.insert(rider_id)
                || self
                    .already_sent(&rider_id, SmsMessageType::PaymentConfirmation, since)
                    .await?
            {
                continue;
            }
            let sms = OutgoingSms {
                rider_id: Some(rider_id),
                recipient: record.rider.primary_phone.clone(),
                message: self
                    .templates
                    .payment_confirmation(&record.rider.full_name, record.payment.amount),
                message_type: SmsMessageType::PaymentConfirmation,
            };
            outcome.record(self.dispatch(&sms).await?.status);
        }
        Ok(outcome)
    }

    async fn remind_riders(
        &self,
        riders: &[FinancedRider],
        today: NaiveDate,
    ) -> Result<RuleOutcome, Error> {
        let mut last_payment: HashMap<Uuid, NaiveDate> = HashMap::new();
        for record in self
            .payments
            .list(&PaymentFilter::completed())
            .await
            .map_err(map_payment_error)?
        {
            let entry = last_payment
                .entry(record.payment.rider_id)
                .or_insert(record.payment.payment_date);
            *entry = (*entry).max(record.payment.payment_date);
        }
        let since = Some(start_of_day(today));
        let mut outcome = RuleOutcome::default();

        for rider in riders {
            if !reminder_due(last_payment.get(&rider.id).copied(), today)
                || self
                    .already_sent(&rider.id, SmsMessageType::PaymentReminder, since)
                    .await?
            {
                continue;
            }
            let message = self
                .templates
                .payment_reminder(&rider.identity.full_name, rider.terms.daily_remittance);
            let sms = to_rider(rider, message, SmsMessageType::PaymentReminder);
            outcome.record(self.dispatch(&sms).await?.status);
        }
        Ok(outcome)
    }

    async fn congratulate_owners(
        &self,
        riders: &[FinancedRider],
        today: NaiveDate,
    ) -> Result<RuleOutcome, Error> {
        let mut outcome = RuleOutcome::default();
        for rider in riders {
            if !ownership_due(rider.terms.start_date, today)
                || self
                    .already_sent(&rider.id, SmsMessageType::OwnershipCongratulations, None)
                    .await?
            {
                continue;
            }
            let message = self
                .templates
                .ownership_congratulations(&rider.identity.full_name);
            let sms = to_rider(rider, message, SmsMessageType::OwnershipCongratulations);
            outcome.record(self.dispatch(&sms).await?.status);
        }
        Ok(outcome)
    }
}

#[async_trait]
impl<S, G: ?Sized, R, P> SmsCommand for SmsService<S, G, R, P>
where
    S: SmsRepository,
    G: SmsGateway,
    R: RiderRepository,
    P: PaymentRepository,
{
    async fn send(&self, sms: OutgoingSms) -> Result<SmsNotification, Error> {
        self.dispatch(&sms).await
    }

    async fn run_automation(&self, rules: AutomationRules) -> Result<AutomationSummary, Error> {
        let today = self.clock.utc().date_naive();
        let mut summary = AutomationSummary::default();

        if rules.payment_confirmation {
            summary.payment_confirmation = self.confirm_payments(today).await?;
        }
        if rules.payment_reminder || rules.ownership_congratulations {
            let riders = self.active_riders().await?;
            if rules.payment_reminder {
                summary.payment_reminder = self.remind_riders(&riders, today).await?;
            }
            if rules.ownership_congratulations {
                summary.ownership_congratulations =
                    self.congratulate_owners(&riders, today).await?;
            }
        }

        info!(
            %today,
            confirmations = summary.payment_confirmation.sent,
            reminders = summary.payment_reminder.sent,
            congratulations = summary.ownership_congratulations.sent,
            "sms automation finished"
        );
        Ok(summary)
    }
}

#[async_trait]
impl<S, G: ?Sized, R, P> SmsQuery for SmsService<S, G, R, P>
where
    S: SmsRepository,
    G: SmsGateway,
    R: RiderRepository,
    P: PaymentRepository,
{
    async fn log(&self, search: SearchTerm) -> Result<SmsLog, Error> {
        let recent = self
            .log
            .list_recent(RECENT_SMS_LIMIT)
            .await
            .map_err(map_sms_error)?;
        let stats = SmsStats::compute(&recent);
        let notifications = search.filter(recent, |notification| {
            vec![
                Some(notification.recipient_phone.as_str()),
                Some(notification.message.as_str()),
                Some(notification.message_type.as_str()),
            ]
        });
        Ok(SmsLog {
            notifications,
            stats,
        })
    }
}

#[cfg(test)]
#[path = "sms_service_tests.rs"]
mod tests;
