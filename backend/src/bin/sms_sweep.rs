//! Run the SMS automation rules once and exit.
//!
//! Intended for cron. Connection and gateway settings come from the same
//! `MOTOFINANCE_*` variables as the server; the flags below only toggle
//! rules.

use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use motofinance::domain::ports::SmsCommand;
use motofinance::domain::{AutomationRules, MessageTemplates, SmsService};
use motofinance::outbound::persistence::{
    DbPool, DieselPaymentRepository, DieselRiderRepository, DieselSmsRepository, PoolConfig,
};
use motofinance::outbound::sms::select_gateway;
use motofinance::settings::AppSettings;

#[derive(Debug, Parser)]
#[command(name = "sms-sweep", about = "Send due automated SMS messages")]
struct Cli {
    /// Skip confirmations for today's completed payments.
    #[arg(long)]
    skip_confirmations: bool,
    /// Skip reminders to riders without a recent payment.
    #[arg(long)]
    skip_reminders: bool,
    /// Skip ownership congratulations.
    #[arg(long)]
    skip_ownership: bool,
}

impl Cli {
    fn rules(&self) -> AutomationRules {
        AutomationRules {
            payment_confirmation: !self.skip_confirmations,
            payment_reminder: !self.skip_reminders,
            ownership_congratulations: !self.skip_ownership,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = AppSettings::load_from_iter([OsString::from("sms-sweep")])
        .wrap_err("failed to load configuration")?;
    let pool = DbPool::new(PoolConfig::new(settings.database_url()?).with_max_size(2))
        .await
        .wrap_err("failed to build database pool")?;
    let gateway = select_gateway(settings.sms_gateway()?).wrap_err("failed to build SMS gateway")?;

    let service = SmsService::new(
        Arc::new(DieselSmsRepository::new(pool.clone())),
        gateway,
        Arc::new(DieselRiderRepository::new(pool.clone())),
        Arc::new(DieselPaymentRepository::new(pool)),
        Arc::new(DefaultClock),
    )
    .with_templates(MessageTemplates::new(settings.sms_signature()));

    let summary = service
        .run_automation(cli.rules())
        .await
        .wrap_err("automation run failed")?;
    info!(
        confirmations_sent = summary.payment_confirmation.sent,
        confirmations_failed = summary.payment_confirmation.failed,
        reminders_sent = summary.payment_reminder.sent,
        reminders_failed = summary.payment_reminder.failed,
        ownership_sent = summary.ownership_congratulations.sent,
        ownership_failed = summary.ownership_congratulations.failed,
        "sms automation finished"
    );
    Ok(())
}
