//! PostgreSQL-backed `PaymentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{PaymentRepository, PaymentRepositoryError};
use crate::domain::{NewPayment, Payment, PaymentFilter, PaymentRecord, PaymentStatus, StaffId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewPaymentRow, PaymentRiderRow, PaymentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{financed_riders, payments};

/// Diesel-backed payment ledger.
#[derive(Clone)]
pub struct DieselPaymentRepository {
    pool: DbPool,
}

impl DieselPaymentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PaymentRepositoryError {
    map_basic_pool_error(error, PaymentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PaymentRepositoryError {
    map_basic_diesel_error(
        error,
        PaymentRepositoryError::query,
        PaymentRepositoryError::connection,
    )
}

fn to_record(
    (payment, rider): (PaymentRow, PaymentRiderRow),
) -> Result<PaymentRecord, PaymentRepositoryError> {
    Ok(PaymentRecord {
        payment: payment
            .into_payment()
            .map_err(PaymentRepositoryError::query)?,
        rider: rider.into(),
    })
}

#[async_trait]
impl PaymentRepository for DieselPaymentRepository {
    async fn insert(
        &self,
        payment: &NewPayment,
        created_by: &StaffId,
    ) -> Result<Payment, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPaymentRow {
            id: Uuid::new_v4(),
            rider_id: payment.rider_id,
            amount_cents: payment.amount.cents(),
            payment_date: payment.payment_date,
            payment_method: payment.payment_method.as_str(),
            status: PaymentStatus::Completed.as_str(),
            transaction_reference: payment.transaction_reference.as_deref(),
            notes: payment.notes.as_deref(),
            created_by: Some(*created_by.as_uuid()),
        };

        diesel::insert_into(payments::table)
            .values(&row)
            .returning(PaymentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_payment()
            .map_err(PaymentRepositoryError::query)
    }

    async fn list(
        &self,
        filter: &PaymentFilter,
    ) -> Result<Vec<PaymentRecord>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = payments::table
            .inner_join(financed_riders::table)
            .select((PaymentRow::as_select(), PaymentRiderRow::as_select()))
            .order((payments::payment_date.desc(), payments::created_at.desc()))
            .into_boxed();

        if let Some(status) = filter.status {
            query = query.filter(payments::status.eq(status.as_str()));
        }
        if let Some(rider_id) = filter.rider_id {
            query = query.filter(payments::rider_id.eq(rider_id));
        }
        if let Some(from) = filter.from {
            query = query.filter(payments::payment_date.ge(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(payments::payment_date.le(to));
        }

        query
            .load::<(PaymentRow, PaymentRiderRow)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(to_record)
            .collect()
    }
}
