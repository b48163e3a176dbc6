//! Rider repayments and repayment progress.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::contact::{IdNumber, KenyanPhone};
use super::money::Money;
use super::rider::{FinancedRider, UnknownVariant};
use super::staff::StaffId;
use super::validation::{self, Field, FieldViolation};

/// Settlement state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Overdue,
}

impl PaymentStatus {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Overdue => "overdue",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "overdue" => Ok(Self::Overdue),
            other => Err(UnknownVariant::new("payment status", other)),
        }
    }
}

/// How the rider paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Mpesa,
    Cash,
    BankTransfer,
    Cheque,
}

impl PaymentMethod {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mpesa => "mpesa",
            Self::Cash => "cash",
            Self::BankTransfer => "bank_transfer",
            Self::Cheque => "cheque",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "mpesa" => Ok(Self::Mpesa),
            "cash" => Ok(Self::Cash),
            "bank_transfer" => Ok(Self::BankTransfer),
            "cheque" => Ok(Self::Cheque),
            other => Err(UnknownVariant::new("payment method", other)),
        }
    }
}

/// A recorded repayment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub rider_id: Uuid,
    #[schema(value_type = f64)]
    pub amount: Money,
    pub payment_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
    #[schema(value_type = Option<String>, format = Uuid)]
    pub created_by: Option<StaffId>,
    pub created_at: DateTime<Utc>,
}

/// Rider details shown next to a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRider {
    pub full_name: String,
    #[schema(value_type = String)]
    pub id_number: IdNumber,
    #[schema(value_type = String)]
    pub primary_phone: KenyanPhone,
}

/// A payment joined with its rider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    #[serde(flatten)]
    pub payment: Payment,
    pub rider: PaymentRider,
}

/// Filter applied when listing payments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentFilter {
    pub status: Option<PaymentStatus>,
    pub rider_id: Option<Uuid>,
    /// Inclusive lower bound on `payment_date`.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on `payment_date`.
    pub to: Option<NaiveDate>,
}

impl PaymentFilter {
    /// Completed payments only.
    pub fn completed() -> Self {
        Self {
            status: Some(PaymentStatus::Completed),
            ..Self::default()
        }
    }

    /// Restrict to an inclusive date range.
    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    /// Whether `payment` passes the filter.
    pub fn matches(&self, payment: &Payment) -> bool {
        self.status.is_none_or(|status| payment.status == status)
            && self.rider_id.is_none_or(|id| payment.rider_id == id)
            && self.from.is_none_or(|from| payment.payment_date >= from)
            && self.to.is_none_or(|to| payment.payment_date <= to)
    }
}

/// Form submitted to record a payment.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    pub rider_id: Uuid,
    pub amount: f64,
    pub payment_date: NaiveDate,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
}

/// A validated payment ready to persist; always stored as completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub rider_id: Uuid,
    pub amount: Money,
    pub payment_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
}

const AMOUNT: Field = Field::new("amount", "Amount");
const TRANSACTION_REFERENCE: Field = Field::new("transactionReference", "Transaction reference");
const NOTES: Field = Field::new("notes", "Notes");

impl TryFrom<PaymentInput> for NewPayment {
    type Error = FieldViolation;

    fn try_from(input: PaymentInput) -> Result<Self, Self::Error> {
        Ok(Self {
            rider_id: input.rider_id,
            amount: validation::positive_amount(
                AMOUNT,
                input.amount,
                Money::from_whole_shillings(1_000_000),
            )?,
            payment_date: input.payment_date,
            payment_method: input.payment_method,
            transaction_reference: validation::optional_text(
                TRANSACTION_REFERENCE,
                input.transaction_reference.as_deref(),
                100,
            )?,
            notes: validation::optional_text(NOTES, input.notes.as_deref(), 500)?,
        })
    }
}

/// Coarse classification of repayment progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProgressBand {
    Completed,
    NearComplete,
    OnTrack,
    Behind,
}

impl ProgressBand {
    /// Band for a percentage in `0..=100`.
    pub fn for_percent(percent: f64) -> Self {
        if percent >= 100.0 {
            Self::Completed
        } else if percent >= 90.0 {
            Self::NearComplete
        } else if percent >= 50.0 {
            Self::OnTrack
        } else {
            Self::Behind
        }
    }
}

/// Repayment progress of one financed rider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProgress {
    pub rider_id: Uuid,
    pub full_name: String,
    #[schema(value_type = String)]
    pub id_number: IdNumber,
    #[schema(value_type = f64)]
    pub total_investment: Money,
    #[schema(value_type = f64)]
    pub daily_remittance: Money,
    #[schema(value_type = f64)]
    pub total_paid: Money,
    #[schema(value_type = f64)]
    pub remaining: Money,
    pub progress_percent: f64,
    pub days_elapsed: i64,
    pub expected_days: i32,
    pub last_payment_date: Option<NaiveDate>,
    pub band: ProgressBand,
}

/// Compute progress for each rider from their completed payments.
///
/// Non-completed payments are ignored. The output follows the order of
/// `riders`.
pub fn payment_progress(
    riders: &[FinancedRider],
    payments: &[Payment],
    today: NaiveDate,
) -> Vec<PaymentProgress> {
    let mut paid: HashMap<Uuid, (Money, Option<NaiveDate>)> = HashMap::new();
    for payment in payments
        .iter()
        .filter(|payment| payment.status == PaymentStatus::Completed)
    {
        let entry = paid.entry(payment.rider_id).or_insert((Money::ZERO, None));
        entry.0 += payment.amount;
        entry.1 = entry.1.max(Some(payment.payment_date));
    }

    riders
        .iter()
        .map(|rider| {
            let (total_paid, last_payment_date) =
                paid.get(&rider.id).copied().unwrap_or((Money::ZERO, None));
            let investment = rider.terms.total_investment;
            let progress_percent = total_paid.percent_of(investment).min(100.0);
            PaymentProgress {
                rider_id: rider.id,
                full_name: rider.identity.full_name.clone(),
                id_number: rider.identity.id_number.clone(),
                total_investment: investment,
                daily_remittance: rider.terms.daily_remittance,
                total_paid,
                remaining: investment.saturating_sub_to_zero(total_paid),
                progress_percent,
                days_elapsed: (today - rider.terms.start_date).num_days().max(0),
                expected_days: rider.terms.expected_operation_days,
                last_payment_date,
                band: ProgressBand::for_percent(progress_percent),
            }
        })
        .collect()
}
