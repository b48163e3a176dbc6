//! Business expenses and the profit analysis built on them.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::money::Money;
use super::rider::UnknownVariant;
use super::staff::StaffId;
use super::validation::{self, Field, FieldViolation};

/// Spending category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Fuel,
    Maintenance,
    Insurance,
    Office,
    Marketing,
    Utilities,
    Staff,
    Other,
}

impl ExpenseCategory {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fuel => "fuel",
            Self::Maintenance => "maintenance",
            Self::Insurance => "insurance",
            Self::Office => "office",
            Self::Marketing => "marketing",
            Self::Utilities => "utilities",
            Self::Staff => "staff",
            Self::Other => "other",
        }
    }
}

impl FromStr for ExpenseCategory {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "fuel" => Ok(Self::Fuel),
            "maintenance" => Ok(Self::Maintenance),
            "insurance" => Ok(Self::Insurance),
            "office" => Ok(Self::Office),
            "marketing" => Ok(Self::Marketing),
            "utilities" => Ok(Self::Utilities),
            "staff" => Ok(Self::Staff),
            "other" => Ok(Self::Other),
            other => Err(UnknownVariant::new("expense category", other)),
        }
    }
}

/// A recorded business expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub category: ExpenseCategory,
    pub description: String,
    #[schema(value_type = f64)]
    pub amount: Money,
    pub expense_date: NaiveDate,
    pub reference_no: Option<String>,
    pub notes: Option<String>,
    #[schema(value_type = String, format = Uuid)]
    pub created_by: StaffId,
    pub created_at: DateTime<Utc>,
}

/// Form submitted to record an expense.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseInput {
    pub category: ExpenseCategory,
    pub description: String,
    pub amount: f64,
    pub expense_date: NaiveDate,
    pub reference_no: Option<String>,
    pub notes: Option<String>,
}

/// A validated expense ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub category: ExpenseCategory,
    pub description: String,
    pub amount: Money,
    pub expense_date: NaiveDate,
    pub reference_no: Option<String>,
    pub notes: Option<String>,
}

const DESCRIPTION: Field = Field::new("description", "Description");
const AMOUNT: Field = Field::new("amount", "Amount");
const REFERENCE_NO: Field = Field::new("referenceNo", "Reference number");
const NOTES: Field = Field::new("notes", "Notes");

impl TryFrom<ExpenseInput> for NewExpense {
    type Error = FieldViolation;

    fn try_from(input: ExpenseInput) -> Result<Self, Self::Error> {
        Ok(Self {
            category: input.category,
            description: validation::text(DESCRIPTION, &input.description, 5, 200)?,
            amount: validation::positive_amount(
                AMOUNT,
                input.amount,
                Money::from_whole_shillings(10_000_000),
            )?,
            expense_date: input.expense_date,
            reference_no: validation::optional_text(REFERENCE_NO, input.reference_no.as_deref(), 50)?,
            notes: validation::optional_text(NOTES, input.notes.as_deref(), 500)?,
        })
    }
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// January 1st to December 31st of `year`, or `None` for unrepresentable years.
    pub fn year(year: i32) -> Option<Self> {
        Some(Self {
            from: NaiveDate::from_ymd_opt(year, 1, 1)?,
            to: NaiveDate::from_ymd_opt(year, 12, 31)?,
        })
    }

    /// The calendar month containing `day`.
    pub fn month_of(day: NaiveDate) -> Option<Self> {
        let from = day.with_day(1)?;
        let next = if day.month() == 12 {
            NaiveDate::from_ymd_opt(day.year() + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(day.year(), day.month() + 1, 1)?
        };
        Some(Self {
            from,
            to: next.pred_opt()?,
        })
    }

    /// Whether `day` falls inside the range.
    pub fn contains(&self, day: NaiveDate) -> bool {
        (self.from..=self.to).contains(&day)
    }
}

/// Reporting window for the expense list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExpensePeriod {
    #[default]
    CurrentYear,
    CurrentMonth,
    AllTime,
}

impl ExpensePeriod {
    /// Date range relative to `today`; `None` means unbounded.
    pub fn range(self, today: NaiveDate) -> Option<DateRange> {
        match self {
            Self::CurrentYear => DateRange::year(today.year()),
            Self::CurrentMonth => DateRange::month_of(today),
            Self::AllTime => None,
        }
    }
}

/// Spend in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    #[schema(value_type = f64)]
    pub amount: Money,
}

/// Sum spend per category, largest first; empty categories are omitted.
pub fn category_breakdown(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<ExpenseCategory, Money> = HashMap::new();
    for expense in expenses {
        *totals.entry(expense.category).or_default() += expense.amount;
    }
    let mut breakdown: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, amount)| CategoryTotal { category, amount })
        .collect();
    breakdown.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.category.cmp(&b.category)));
    breakdown
}

/// Percentage change from `previous` to `current`; zero when `previous` is zero.
pub fn growth_percent(current: Money, previous: Money) -> f64 {
    if previous.cents() <= 0 {
        return 0.0;
    }
    (current - previous).percent_of(previous)
}

/// Revenue against expenses for the current year compared with the last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfitAnalysis {
    pub year: i32,
    #[schema(value_type = f64)]
    pub total_revenue: Money,
    #[schema(value_type = f64)]
    pub total_expenses: Money,
    #[schema(value_type = f64)]
    pub net_profit: Money,
    pub profit_margin: f64,
    pub revenue_growth: f64,
    pub expense_growth: f64,
}

/// Yearly totals feeding [`ProfitAnalysis::compute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearTotals {
    pub revenue: Money,
    pub expenses: Money,
}

impl ProfitAnalysis {
    /// Derive margins and growth from this year's and last year's totals.
    pub fn compute(year: i32, current: YearTotals, previous: YearTotals) -> Self {
        let net_profit = current.revenue - current.expenses;
        Self {
            year,
            total_revenue: current.revenue,
            total_expenses: current.expenses,
            net_profit,
            profit_margin: net_profit.percent_of(current.revenue),
            revenue_growth: growth_percent(current.revenue, previous.revenue),
            expense_growth: growth_percent(current.expenses, previous.expenses),
        }
    }
}
