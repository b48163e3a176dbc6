//! Driving ports for the motorcycle inventory.

use async_trait::async_trait;

use crate::domain::{Bike, Error, NewBike, SearchTerm};

/// Inventory mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BikeCommand: Send + Sync {
    /// Register a motorcycle.
    async fn register(&self, bike: NewBike) -> Result<Bike, Error>;
}

/// Inventory reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BikeQuery: Send + Sync {
    /// Bikes matching `search` on registration, make or chassis number.
    async fn list(&self, search: SearchTerm) -> Result<Vec<Bike>, Error>;
}
