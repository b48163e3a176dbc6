//! Rider registration and financing service.
//!
//! Financing checks the bike and the prospect before handing the conversion
//! to the repository, which repeats those checks inside its transaction.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{
    BikeRepository, BikeRepositoryError, RiderCommand, RiderQuery, RiderRepository,
    RiderRepositoryError,
};
use crate::domain::{
    Error, FinancedRider, NewFinancedRider, NewPotentialRider, PotentialRider, RiderStatus,
    SearchTerm, StaffId,
};

/// Rider service implementing [`RiderCommand`] and [`RiderQuery`].
#[derive(Clone)]
pub struct RiderService<R, B> {
    riders: Arc<R>,
    bikes: Arc<B>,
}

impl<R, B> RiderService<R, B> {
    /// Create a new service over the rider and bike repositories.
    pub fn new(riders: Arc<R>, bikes: Arc<B>) -> Self {
        Self { riders, bikes }
    }
}

fn map_rider_error(error: RiderRepositoryError) -> Error {
    match error {
        RiderRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("rider repository unavailable: {message}"))
        }
        RiderRepositoryError::Query { message } => {
            Error::internal(format!("rider repository error: {message}"))
        }
        RiderRepositoryError::BikeUnavailable { bike_id } => {
            Error::conflict(format!("bike {bike_id} is not available"))
        }
        RiderRepositoryError::ProspectAlreadyFinanced { rider_id } => {
            Error::conflict(format!("potential rider {rider_id} has already been financed"))
        }
    }
}

fn map_bike_error(error: BikeRepositoryError) -> Error {
    match error {
        BikeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("bike repository unavailable: {message}"))
        }
        BikeRepositoryError::Query { message }
        | BikeRepositoryError::DuplicateIdentifier { message } => {
            Error::internal(format!("bike repository error: {message}"))
        }
    }
}

impl<R, B> RiderService<R, B>
where
    R: RiderRepository,
    B: BikeRepository,
{
    async fn ensure_bike_available(&self, bike_id: &Uuid) -> Result<(), Error> {
        let bike = self
            .bikes
            .find_by_id(bike_id)
            .await
            .map_err(map_bike_error)?
            .ok_or_else(|| Error::not_found(format!("bike {bike_id} not found")))?;
        if !bike.is_available() {
            return Err(Error::conflict(format!(
                "bike {bike_id} is {}",
                bike.status.as_str()
            )));
        }
        Ok(())
    }

    async fn ensure_prospect_open(&self, rider_id: &Uuid) -> Result<(), Error> {
        let prospect = self
            .riders
            .find_potential(rider_id)
            .await
            .map_err(map_rider_error)?
            .ok_or_else(|| Error::not_found(format!("potential rider {rider_id} not found")))?;
        if prospect.status != RiderStatus::Potential {
            return Err(Error::conflict(format!(
                "potential rider {rider_id} is already {}",
                prospect.status.as_str()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<R, B> RiderCommand for RiderService<R, B>
where
    R: RiderRepository,
    B: BikeRepository,
{
    async fn register_potential(
        &self,
        rider: NewPotentialRider,
        staff_id: StaffId,
    ) -> Result<PotentialRider, Error> {
        self.riders
            .insert_potential(&rider, &staff_id)
            .await
            .map_err(map_rider_error)
    }

    async fn finance(
        &self,
        rider: NewFinancedRider,
        staff_id: StaffId,
    ) -> Result<FinancedRider, Error> {
        self.ensure_bike_available(&rider.bike_id).await?;
        if let Some(prospect_id) = rider.potential_rider_id {
            self.ensure_prospect_open(&prospect_id).await?;
        }

        let financed = self
            .riders
            .finance(&rider, &staff_id)
            .await
            .map_err(map_rider_error)?;
        info!(
            rider_id = %financed.id,
            bike_id = %rider.bike_id,
            staff_id = %staff_id,
            "rider financed"
        );
        Ok(financed)
    }
}

#[async_trait]
impl<R, B> RiderQuery for RiderService<R, B>
where
    R: RiderRepository,
    B: BikeRepository,
{
    async fn list_potential(&self, search: SearchTerm) -> Result<Vec<PotentialRider>, Error> {
        let riders = self.riders.list_potential().await.map_err(map_rider_error)?;
        Ok(search.filter(riders, |rider| {
            vec![
                Some(rider.identity.full_name.as_str()),
                Some(rider.identity.id_number.as_str()),
                Some(rider.identity.primary_phone.as_str()),
            ]
        }))
    }

    async fn get_potential(&self, id: Uuid) -> Result<PotentialRider, Error> {
        self.riders
            .find_potential(&id)
            .await
            .map_err(map_rider_error)?
            .ok_or_else(|| Error::not_found(format!("potential rider {id} not found")))
    }

    async fn list_financed(&self, search: SearchTerm) -> Result<Vec<FinancedRider>, Error> {
        let riders = self
            .riders
            .list_financed(Some(RiderStatus::Financed))
            .await
            .map_err(map_rider_error)?;
        Ok(search.filter(riders, |rider| {
            vec![
                Some(rider.identity.id_number.as_str()),
                Some(rider.identity.full_name.as_str()),
            ]
        }))
    }

    async fn get_financed(&self, id: Uuid) -> Result<FinancedRider, Error> {
        self.riders
            .find_financed(&id)
            .await
            .map_err(map_rider_error)?
            .ok_or_else(|| Error::not_found(format!("financed rider {id} not found")))
    }
}
