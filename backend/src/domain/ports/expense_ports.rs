//! Driving ports for expenses and profit analysis.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    CategoryTotal, Error, Expense, ExpensePeriod, Money, NewExpense, ProfitAnalysis, SearchTerm,
    StaffId,
};

/// Expenses in a period with their totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseListing {
    pub period: ExpensePeriod,
    pub expenses: Vec<Expense>,
    #[schema(value_type = f64)]
    pub total: Money,
    pub by_category: Vec<CategoryTotal>,
}

/// Expense mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExpenseCommand: Send + Sync {
    /// Record an expense on behalf of `staff_id`.
    async fn record(&self, expense: NewExpense, staff_id: StaffId) -> Result<Expense, Error>;
}

/// Expense reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExpenseQuery: Send + Sync {
    /// Expenses in `period` matching `search`.
    async fn list(&self, period: ExpensePeriod, search: SearchTerm) -> Result<ExpenseListing, Error>;

    /// Current year against previous year.
    async fn profit_analysis(&self) -> Result<ProfitAnalysis, Error>;
}
