//! PostgreSQL-backed `BikeRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{BikeRepository, BikeRepositoryError};
use crate::domain::{Bike, NewBike};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{BikeRow, NewBikeRow};
use super::pool::{DbPool, PoolError};
use super::schema::bikes;

/// Diesel-backed bike inventory.
#[derive(Clone)]
pub struct DieselBikeRepository {
    pool: DbPool,
}

impl DieselBikeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BikeRepositoryError {
    map_basic_pool_error(error, BikeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BikeRepositoryError {
    map_basic_diesel_error(
        error,
        BikeRepositoryError::query,
        BikeRepositoryError::connection,
    )
}

/// Chassis, engine and registration numbers are unique; say which one clashed.
fn duplicate_message(constraint: &str) -> &'static str {
    if constraint.contains("chassis") {
        "a bike with this chassis number already exists"
    } else if constraint.contains("engine") {
        "a bike with this engine number already exists"
    } else if constraint.contains("registration") {
        "a bike with this registration number already exists"
    } else {
        "a bike with these identifiers already exists"
    }
}

fn to_bike(row: BikeRow) -> Result<Bike, BikeRepositoryError> {
    row.into_bike().map_err(BikeRepositoryError::query)
}

#[async_trait]
impl BikeRepository for DieselBikeRepository {
    async fn insert(&self, bike: &NewBike) -> Result<Bike, BikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewBikeRow {
            id: Uuid::new_v4(),
            make: &bike.make,
            chassis_no: &bike.chassis_no,
            engine_no: &bike.engine_no,
            registration_no: bike.registration_no.as_deref(),
            colour: &bike.colour,
            purchase_date: bike.purchase_date,
            purchase_price_cents: bike.purchase_price.cents(),
            status: bike.status.as_str(),
        };

        let inserted = diesel::insert_into(bikes::table)
            .values(&row)
            .returning(BikeRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| match unique_violation(&error) {
                Some(constraint) => {
                    BikeRepositoryError::duplicate_identifier(duplicate_message(constraint))
                }
                None => map_diesel_error(error),
            })?;
        to_bike(inserted)
    }

    async fn list(&self) -> Result<Vec<Bike>, BikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        bikes::table
            .select(BikeRow::as_select())
            .order(bikes::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(to_bike)
            .collect()
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Bike>, BikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        bikes::table
            .filter(bikes::id.eq(id))
            .select(BikeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(to_bike)
            .transpose()
    }
}
