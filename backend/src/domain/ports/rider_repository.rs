//! Port for rider persistence.
//!
//! Financing touches three tables (riders, bikes, prospects); adapters must
//! apply [`RiderRepository::finance`] atomically.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    FinancedRider, NewFinancedRider, NewPotentialRider, PotentialRider, RiderStatus, StaffId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by rider repository adapters.
    pub enum RiderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "rider repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "rider repository query failed: {message}",
        /// The bike was taken by another rider while financing.
        BikeUnavailable { bike_id: Uuid } =>
            "bike {bike_id} is no longer available",
        /// The prospect was converted concurrently.
        ProspectAlreadyFinanced { rider_id: Uuid } =>
            "potential rider {rider_id} has already been financed",
    }
}

/// Port for reading and writing riders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RiderRepository: Send + Sync {
    /// Store a new prospect with status `potential`.
    async fn insert_potential(
        &self,
        rider: &NewPotentialRider,
        created_by: &StaffId,
    ) -> Result<PotentialRider, RiderRepositoryError>;

    /// All prospects, newest first.
    async fn list_potential(&self) -> Result<Vec<PotentialRider>, RiderRepositoryError>;

    /// Find a prospect by id.
    async fn find_potential(&self, id: &Uuid)
    -> Result<Option<PotentialRider>, RiderRepositoryError>;

    /// Insert the financed rider, assign the bike and mark the prospect as
    /// financed, all in one transaction.
    async fn finance(
        &self,
        rider: &NewFinancedRider,
        created_by: &StaffId,
    ) -> Result<FinancedRider, RiderRepositoryError>;

    /// Financed riders with their bike summary, newest first, optionally
    /// restricted to one status.
    async fn list_financed(
        &self,
        status: Option<RiderStatus>,
    ) -> Result<Vec<FinancedRider>, RiderRepositoryError>;

    /// Find a financed rider by id, with bike summary.
    async fn find_financed(&self, id: &Uuid) -> Result<Option<FinancedRider>, RiderRepositoryError>;
}
