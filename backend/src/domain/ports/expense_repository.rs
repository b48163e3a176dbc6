//! Port for expense persistence.

use async_trait::async_trait;

use crate::domain::{DateRange, Expense, NewExpense, StaffId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by expense repository adapters.
    pub enum ExpenseRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "expense repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "expense repository query failed: {message}",
    }
}

/// Port for reading and writing expenses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Store an expense.
    async fn insert(
        &self,
        expense: &NewExpense,
        created_by: &StaffId,
    ) -> Result<Expense, ExpenseRepositoryError>;

    /// Expenses dated within `range` (all when `None`), newest first.
    async fn list(&self, range: Option<DateRange>) -> Result<Vec<Expense>, ExpenseRepositoryError>;
}
