//! PostgreSQL-backed `ExpenseRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ExpenseRepository, ExpenseRepositoryError};
use crate::domain::{DateRange, Expense, NewExpense, StaffId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ExpenseRow, NewExpenseRow};
use super::pool::{DbPool, PoolError};
use super::schema::expenses;

/// Diesel-backed expense ledger.
#[derive(Clone)]
pub struct DieselExpenseRepository {
    pool: DbPool,
}

impl DieselExpenseRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ExpenseRepositoryError {
    map_basic_pool_error(error, ExpenseRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ExpenseRepositoryError {
    map_basic_diesel_error(
        error,
        ExpenseRepositoryError::query,
        ExpenseRepositoryError::connection,
    )
}

#[async_trait]
impl ExpenseRepository for DieselExpenseRepository {
    async fn insert(
        &self,
        expense: &NewExpense,
        created_by: &StaffId,
    ) -> Result<Expense, ExpenseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewExpenseRow {
            id: Uuid::new_v4(),
            category: expense.category.as_str(),
            description: &expense.description,
            amount_cents: expense.amount.cents(),
            expense_date: expense.expense_date,
            reference_no: expense.reference_no.as_deref(),
            notes: expense.notes.as_deref(),
            created_by: *created_by.as_uuid(),
        };

        diesel::insert_into(expenses::table)
            .values(&row)
            .returning(ExpenseRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_expense()
            .map_err(ExpenseRepositoryError::query)
    }

    async fn list(&self, range: Option<DateRange>) -> Result<Vec<Expense>, ExpenseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = expenses::table
            .select(ExpenseRow::as_select())
            .order((expenses::expense_date.desc(), expenses::created_at.desc()))
            .into_boxed();
        if let Some(range) = range {
            query = query.filter(expenses::expense_date.between(range.from, range.to));
        }

        query
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(|row: ExpenseRow| row.into_expense().map_err(ExpenseRepositoryError::query))
            .collect()
    }
}
