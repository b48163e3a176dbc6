//! Driving ports for rider registration and lookup.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Error, FinancedRider, NewFinancedRider, NewPotentialRider, PotentialRider, SearchTerm, StaffId,
};

/// Rider mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RiderCommand: Send + Sync {
    /// Register a prospect on behalf of `staff_id`.
    async fn register_potential(
        &self,
        rider: NewPotentialRider,
        staff_id: StaffId,
    ) -> Result<PotentialRider, Error>;

    /// Convert a prospect into a financed rider bound to a bike.
    async fn finance(&self, rider: NewFinancedRider, staff_id: StaffId)
    -> Result<FinancedRider, Error>;
}

/// Rider reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RiderQuery: Send + Sync {
    /// Prospects matching `search`, newest first.
    async fn list_potential(&self, search: SearchTerm) -> Result<Vec<PotentialRider>, Error>;

    /// One prospect.
    async fn get_potential(&self, id: Uuid) -> Result<PotentialRider, Error>;

    /// Active financed riders matching `search`, newest first.
    async fn list_financed(&self, search: SearchTerm) -> Result<Vec<FinancedRider>, Error>;

    /// One financed rider.
    async fn get_financed(&self, id: Uuid) -> Result<FinancedRider, Error>;
}
