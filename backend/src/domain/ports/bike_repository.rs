//! Port for motorcycle inventory persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Bike, NewBike};

use super::define_port_error;

define_port_error! {
    /// Errors raised by bike repository adapters.
    pub enum BikeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "bike repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "bike repository query failed: {message}",
        /// Chassis or engine number already registered.
        DuplicateIdentifier { message: String } =>
            "bike already registered: {message}",
    }
}

/// Port for reading and writing bikes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BikeRepository: Send + Sync {
    /// Store a new bike.
    async fn insert(&self, bike: &NewBike) -> Result<Bike, BikeRepositoryError>;

    /// All bikes, newest first.
    async fn list(&self) -> Result<Vec<Bike>, BikeRepositoryError>;

    /// Find a bike by id.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Bike>, BikeRepositoryError>;
}
