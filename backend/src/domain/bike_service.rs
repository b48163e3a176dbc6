//! Motorcycle inventory service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{BikeCommand, BikeQuery, BikeRepository, BikeRepositoryError};
use crate::domain::{Bike, Error, NewBike, SearchTerm};

/// Inventory service implementing [`BikeCommand`] and [`BikeQuery`].
#[derive(Clone)]
pub struct BikeService<B> {
    bikes: Arc<B>,
}

impl<B> BikeService<B> {
    /// Create a new service over the bike repository.
    pub fn new(bikes: Arc<B>) -> Self {
        Self { bikes }
    }
}

fn map_bike_error(error: BikeRepositoryError) -> Error {
    match error {
        BikeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("bike repository unavailable: {message}"))
        }
        BikeRepositoryError::Query { message } => {
            Error::internal(format!("bike repository error: {message}"))
        }
        BikeRepositoryError::DuplicateIdentifier { message } => Error::conflict(message),
    }
}

#[async_trait]
impl<B> BikeCommand for BikeService<B>
where
    B: BikeRepository,
{
    async fn register(&self, bike: NewBike) -> Result<Bike, Error> {
        self.bikes.insert(&bike).await.map_err(map_bike_error)
    }
}

#[async_trait]
impl<B> BikeQuery for BikeService<B>
where
    B: BikeRepository,
{
    async fn list(&self, search: SearchTerm) -> Result<Vec<Bike>, Error> {
        let bikes = self.bikes.list().await.map_err(map_bike_error)?;
        Ok(search.filter(bikes, |bike| {
            vec![
                bike.registration_no.as_deref(),
                Some(bike.make.as_str()),
                Some(bike.chassis_no.as_str()),
            ]
        }))
    }
}
