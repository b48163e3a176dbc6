//! Dashboard and annual report service.
//!
//! Loads the rows each report needs and delegates the arithmetic to
//! [`DashboardStats::compute`] and [`AnnualReport::compute`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use mockable::Clock;
use serde_json::json;

use crate::domain::ports::{
    BikeRepository, BikeRepositoryError, ExpenseRepository, ExpenseRepositoryError,
    PaymentRepository, PaymentRepositoryError, ReportQuery, RiderRepository, RiderRepositoryError,
};
use crate::domain::reports::{AnnualInputs, DashboardCounts, check_report_year};
use crate::domain::{AnnualReport, DashboardStats, Error, Payment, PaymentFilter};

/// Driven ports the report service reads from.
pub struct ReportSources<R, B, P, E> {
    pub riders: Arc<R>,
    pub bikes: Arc<B>,
    pub payments: Arc<P>,
    pub expenses: Arc<E>,
}

/// Report service implementing [`ReportQuery`].
pub struct ReportService<R, B, P, E> {
    sources: ReportSources<R, B, P, E>,
    clock: Arc<dyn Clock>,
}

impl<R, B, P, E> ReportService<R, B, P, E> {
    /// Create a new service over the given repositories.
    pub fn new(sources: ReportSources<R, B, P, E>, clock: Arc<dyn Clock>) -> Self {
        Self { sources, clock }
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

fn map_bike_error(error: BikeRepositoryError) -> Error {
    match error {
        BikeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("bike repository unavailable: {message}"))
        }
        other => Error::internal(format!("bike repository error: {other}")),
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

impl<R, B, P, E> ReportService<R, B, P, E>
where
    P: PaymentRepository,
{
    async fn payments(&self, filter: PaymentFilter) -> Result<Vec<Payment>, Error> {
        Ok(self
            .sources
            .payments
            .list(&filter)
            .await
            .map_err(map_payment_error)?
            .into_iter()
            .map(|record| record.payment)
            .collect())
    }
}

#[async_trait]
impl<R, B, P, E> ReportQuery for ReportService<R, B, P, E>
where
    R: RiderRepository,
    B: BikeRepository,
    P: PaymentRepository,
    E: ExpenseRepository,
{
    async fn dashboard(&self) -> Result<DashboardStats, Error> {
        let potential = self
            .sources
            .riders
            .list_potential()
            .await
            .map_err(map_rider_error)?;
        let financed = self
            .sources
            .riders
            .list_financed(None)
            .await
            .map_err(map_rider_error)?;
        let bikes = self.sources.bikes.list().await.map_err(map_bike_error)?;
        let payments = self.payments(PaymentFilter::default()).await?;

        let counts = DashboardCounts {
            potential_riders: potential.len(),
            bikes: bikes.len(),
        };
        Ok(DashboardStats::compute(counts, &financed, &payments))
    }

    async fn annual(&self, year: i32) -> Result<AnnualReport, Error> {
        let today = self.clock.utc().date_naive();
        let range = check_report_year(year, today).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "field": "year",
                "min": err.min,
                "max": err.max,
            }))
        })?;
        let previous_start = range
            .from
            .with_year(year - 1)
            .ok_or_else(|| Error::internal(format!("year {} is out of range", year - 1)))?;

        let payments = self
            .payments(PaymentFilter::default().between(previous_start, range.to))
            .await?;
        let expenses = self
            .sources
            .expenses
            .list(Some(range))
            .await
            .map_err(map_expense_error)?;
        let riders = self
            .sources
            .riders
            .list_financed(None)
            .await
            .map_err(map_rider_error)?;
        let bikes = self.sources.bikes.list().await.map_err(map_bike_error)?;

        Ok(AnnualReport::compute(
            year,
            AnnualInputs {
                payments: &payments,
                expenses: &expenses,
                riders: &riders,
                bikes: &bikes,
            },
        ))
    }
}
