//! Payment recording and repayment progress service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::payment::payment_progress;
use crate::domain::ports::{
    PaymentCommand, PaymentQuery, PaymentRepository, PaymentRepositoryError, RiderRepository,
    RiderRepositoryError,
};
use crate::domain::{
    Error, NewPayment, Payment, PaymentFilter, PaymentProgress, PaymentRecord, RiderStatus,
    SearchTerm, StaffId,
};

/// Payment service implementing [`PaymentCommand`] and [`PaymentQuery`].
#[derive(Clone)]
pub struct PaymentService<P, R> {
    payments: Arc<P>,
    riders: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<P, R> PaymentService<P, R> {
    /// Create a new service; `clock` supplies today's date for progress.
    pub fn new(payments: Arc<P>, riders: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            payments,
            riders,
            clock,
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

fn map_rider_error(error: RiderRepositoryError) -> Error {
    match error {
        RiderRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("rider repository unavailable: {message}"))
        }
        other => Error::internal(format!("rider repository error: {other}")),
    }
}

#[async_trait]
impl<P, R> PaymentCommand for PaymentService<P, R>
where
    P: PaymentRepository,
    R: RiderRepository,
{
    async fn record(&self, payment: NewPayment, staff_id: StaffId) -> Result<Payment, Error> {
        let rider_id = payment.rider_id;
        if self
            .riders
            .find_financed(&rider_id)
            .await
            .map_err(map_rider_error)?
            .is_none()
        {
            return Err(Error::not_found(format!("financed rider {rider_id} not found")));
        }

        let stored = self
            .payments
            .insert(&payment, &staff_id)
            .await
            .map_err(map_payment_error)?;
        debug!(payment_id = %stored.id, rider_id = %rider_id, amount = %stored.amount, "payment recorded");
        Ok(stored)
    }
}

#[async_trait]
impl<P, R> PaymentQuery for PaymentService<P, R>
where
    P: PaymentRepository,
    R: RiderRepository,
{
    async fn list(&self, search: SearchTerm) -> Result<Vec<PaymentRecord>, Error> {
        let records = self
            .payments
            .list(&PaymentFilter::default())
            .await
            .map_err(map_payment_error)?;
        Ok(search.filter(records, |record| {
            vec![
                Some(record.rider.id_number.as_str()),
                Some(record.rider.full_name.as_str()),
                record.payment.transaction_reference.as_deref(),
            ]
        }))
    }

    async fn progress(&self, search: SearchTerm) -> Result<Vec<PaymentProgress>, Error> {
        let riders = self
            .riders
            .list_financed(Some(RiderStatus::Financed))
            .await
            .map_err(map_rider_error)?;
        let riders = search.filter(riders, |rider| {
            vec![
                Some(rider.identity.id_number.as_str()),
                Some(rider.identity.full_name.as_str()),
            ]
        });
        let payments: Vec<Payment> = self
            .payments
            .list(&PaymentFilter::completed())
            .await
            .map_err(map_payment_error)?
            .into_iter()
            .map(|record| record.payment)
            .collect();

        let today = self.clock.utc().date_naive();
        Ok(payment_progress(&riders, &payments, today))
    }
}
