//! Expense recording and profit analysis service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use mockable::Clock;

use crate::domain::expense::category_breakdown;
use crate::domain::ports::{
    ExpenseCommand, ExpenseListing, ExpenseQuery, ExpenseRepository, ExpenseRepositoryError,
    PaymentRepository, PaymentRepositoryError,
};
use crate::domain::{
    DateRange, Error, Expense, ExpensePeriod, Money, NewExpense, PaymentFilter, ProfitAnalysis,
    SearchTerm, StaffId, YearTotals,
};

/// Expense service implementing [`ExpenseCommand`] and [`ExpenseQuery`].
#[derive(Clone)]
pub struct ExpenseService<E, P> {
    expenses: Arc<E>,
    payments: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<E, P> ExpenseService<E, P> {
    /// Create a new service; `clock` anchors the reporting periods.
    pub fn new(expenses: Arc<E>, payments: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            expenses,
            payments,
            clock,
        }
    }
}

fn map_expense_error(error: ExpenseRepositoryError) -> Error {
    match error {
        ExpenseRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("expense repository unavailable: {message}"))
        }
        ExpenseRepositoryError::Query { message } => {
            Error::internal(format!("expense repository error: {message}"))
        }
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

impl<E, P> ExpenseService<E, P>
where
    E: ExpenseRepository,
    P: PaymentRepository,
{
    async fn year_totals(&self, year: i32) -> Result<YearTotals, Error> {
        let range = DateRange::year(year)
            .ok_or_else(|| Error::internal(format!("year {year} is out of range")))?;
        let revenue: Money = self
            .payments
            .list(&PaymentFilter::completed().between(range.from, range.to))
            .await
            .map_err(map_payment_error)?
            .iter()
            .map(|record| record.payment.amount)
            .sum();
        let expenses: Money = self
            .expenses
            .list(Some(range))
            .await
            .map_err(map_expense_error)?
            .iter()
            .map(|expense| expense.amount)
            .sum();
        Ok(YearTotals { revenue, expenses })
    }
}

#[async_trait]
impl<E, P> ExpenseCommand for ExpenseService<E, P>
where
    E: ExpenseRepository,
    P: PaymentRepository,
{
    async fn record(&self, expense: NewExpense, staff_id: StaffId) -> Result<Expense, Error> {
        self.expenses
            .insert(&expense, &staff_id)
            .await
            .map_err(map_expense_error)
    }
}

#[async_trait]
impl<E, P> ExpenseQuery for ExpenseService<E, P>
where
    E: ExpenseRepository,
    P: PaymentRepository,
{
    async fn list(&self, period: ExpensePeriod, search: SearchTerm) -> Result<ExpenseListing, Error> {
        let today = self.clock.utc().date_naive();
        let expenses = self
            .expenses
            .list(period.range(today))
            .await
            .map_err(map_expense_error)?;
        let expenses = search.filter(expenses, |expense| {
            vec![
                Some(expense.description.as_str()),
                Some(expense.category.as_str()),
                expense.reference_no.as_deref(),
            ]
        });
        let total: Money = expenses.iter().map(|expense| expense.amount).sum();
        let by_category = category_breakdown(&expenses);
        Ok(ExpenseListing {
            period,
            expenses,
            total,
            by_category,
        })
    }

    async fn profit_analysis(&self) -> Result<ProfitAnalysis, Error> {
        let year = self.clock.utc().year();
        let current = self.year_totals(year).await?;
        let previous = self.year_totals(year - 1).await?;
        Ok(ProfitAnalysis::compute(year, current, previous))
    }
}
