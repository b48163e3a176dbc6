//! Driving port for the dashboard and annual reports.

use async_trait::async_trait;

use crate::domain::{AnnualReport, DashboardStats, Error};

/// Aggregated reporting reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportQuery: Send + Sync {
    /// Headline counters.
    async fn dashboard(&self) -> Result<DashboardStats, Error>;

    /// Profit and loss for `year`.
    async fn annual(&self, year: i32) -> Result<AnnualReport, Error>;
}
