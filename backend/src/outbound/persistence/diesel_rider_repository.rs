//! PostgreSQL-backed `RiderRepository` implementation using Diesel ORM.
//!
//! Financing locks the bike row (and the prospect row, when linked) with
//! `SELECT ... FOR UPDATE` inside a single transaction, so two clerks cannot
//! hand the same bike to different riders.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{RiderRepository, RiderRepositoryError};
use crate::domain::{
    BikeStatus, FinancedRider, NewFinancedRider, NewPotentialRider, PotentialRider, RiderStatus,
    StaffId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{
    BikeSummaryRow, FinancedRiderRow, NewFinancedRiderRow, NewPotentialRiderRow, PotentialRiderRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{bikes, financed_riders, potential_riders};

/// Diesel-backed store for prospects and financed riders.
#[derive(Clone)]
pub struct DieselRiderRepository {
    pool: DbPool,
}

impl DieselRiderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RiderRepositoryError {
    map_basic_pool_error(error, RiderRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RiderRepositoryError {
    map_basic_diesel_error(
        error,
        RiderRepositoryError::query,
        RiderRepositoryError::connection,
    )
}

/// Reasons the financing transaction rolls back.
#[derive(Debug)]
enum FinanceAbort {
    Database(diesel::result::Error),
    BikeMissing,
    BikeUnavailable(Uuid),
    ProspectMissing,
    ProspectAlreadyFinanced(Uuid),
}

impl From<diesel::result::Error> for FinanceAbort {
    fn from(error: diesel::result::Error) -> Self {
        Self::Database(error)
    }
}

impl From<FinanceAbort> for RiderRepositoryError {
    fn from(abort: FinanceAbort) -> Self {
        match abort {
            FinanceAbort::Database(error) => map_diesel_error(error),
            FinanceAbort::BikeMissing => RiderRepositoryError::query("bike not found"),
            FinanceAbort::BikeUnavailable(bike_id) => RiderRepositoryError::bike_unavailable(bike_id),
            FinanceAbort::ProspectMissing => {
                RiderRepositoryError::query("potential rider not found")
            }
            FinanceAbort::ProspectAlreadyFinanced(rider_id) => {
                RiderRepositoryError::prospect_already_financed(rider_id)
            }
        }
    }
}

fn to_potential(row: PotentialRiderRow) -> Result<PotentialRider, RiderRepositoryError> {
    row.into_rider().map_err(RiderRepositoryError::query)
}

fn to_financed(
    (row, bike): (FinancedRiderRow, Option<BikeSummaryRow>),
) -> Result<FinancedRider, RiderRepositoryError> {
    row.into_rider(bike.map(Into::into))
        .map_err(RiderRepositoryError::query)
}

fn new_potential_row<'a>(
    id: Uuid,
    rider: &'a NewPotentialRider,
    created_by: &StaffId,
) -> NewPotentialRiderRow<'a> {
    let identity = &rider.identity;
    let introducer = &rider.introducer;
    NewPotentialRiderRow {
        id,
        full_name: &identity.full_name,
        id_number: identity.id_number.as_str(),
        age: identity.age,
        postal_address: &identity.postal_address,
        primary_phone: identity.primary_phone.as_str(),
        secondary_phone: identity.secondary_phone.as_ref().map(|p| p.as_str()),
        tertiary_phone: identity.tertiary_phone.as_ref().map(|p| p.as_str()),
        introducer_name: introducer.name.as_deref(),
        introducer_id: introducer.id.as_deref(),
        introducer_phone: introducer.phone.as_ref().map(|p| p.as_str()),
        introducer_residential_area: introducer.residential_area.as_deref(),
        introducer_previous_bike: introducer.previous_bike.as_deref(),
        preferred_bike_make: rider.preferred_bike_make.as_deref(),
        probable_financing_date: rider.probable_financing_date,
        status: RiderStatus::Potential.as_str(),
        created_by: *created_by.as_uuid(),
    }
}

fn new_financed_row<'a>(
    id: Uuid,
    rider: &'a NewFinancedRider,
    created_by: &StaffId,
) -> NewFinancedRiderRow<'a> {
    let identity = &rider.identity;
    let terms = &rider.terms;
    NewFinancedRiderRow {
        id,
        potential_rider_id: rider.potential_rider_id,
        bike_id: Some(rider.bike_id),
        full_name: &identity.full_name,
        id_number: identity.id_number.as_str(),
        age: identity.age,
        postal_address: &identity.postal_address,
        residential_area: &rider.residential_area,
        primary_phone: identity.primary_phone.as_str(),
        secondary_phone: identity.secondary_phone.as_ref().map(|p| p.as_str()),
        tertiary_phone: identity.tertiary_phone.as_ref().map(|p| p.as_str()),
        next_of_kin_name: &rider.next_of_kin.name,
        next_of_kin_phone: rider.next_of_kin.phone.as_str(),
        next_of_kin_id: &rider.next_of_kin.id,
        next_of_kin_relationship: &rider.next_of_kin.relationship,
        referee_name: rider.referee.name.as_deref(),
        referee_id: rider.referee.id.as_deref(),
        referee_phone: rider.referee.phone.as_ref().map(|p| p.as_str()),
        operation_slot: terms.operation_slot.as_str(),
        operation_slot_cost_cents: terms.operation_slot_cost.cents(),
        daily_remittance_cents: terms.daily_remittance.cents(),
        total_investment_cents: terms.total_investment.cents(),
        expected_operation_days: terms.expected_operation_days,
        start_date: terms.start_date,
        status: RiderStatus::Financed.as_str(),
        created_by: Some(*created_by.as_uuid()),
    }
}

async fn load_financed(
    conn: &mut AsyncPgConnection,
    id: &Uuid,
) -> Result<Option<FinancedRider>, RiderRepositoryError> {
    financed_riders::table
        .left_join(bikes::table)
        .filter(financed_riders::id.eq(id))
        .select((
            FinancedRiderRow::as_select(),
            Option::<BikeSummaryRow>::as_select(),
        ))
        .first::<(FinancedRiderRow, Option<BikeSummaryRow>)>(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?
        .map(to_financed)
        .transpose()
}

#[async_trait]
impl RiderRepository for DieselRiderRepository {
    async fn insert_potential(
        &self,
        rider: &NewPotentialRider,
        created_by: &StaffId,
    ) -> Result<PotentialRider, RiderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = new_potential_row(Uuid::new_v4(), rider, created_by);

        let inserted = diesel::insert_into(potential_riders::table)
            .values(&row)
            .returning(PotentialRiderRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_potential(inserted)
    }

    async fn list_potential(&self) -> Result<Vec<PotentialRider>, RiderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        potential_riders::table
            .select(PotentialRiderRow::as_select())
            .order(potential_riders::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(to_potential)
            .collect()
    }

    async fn find_potential(
        &self,
        id: &Uuid,
    ) -> Result<Option<PotentialRider>, RiderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        potential_riders::table
            .filter(potential_riders::id.eq(id))
            .select(PotentialRiderRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(to_potential)
            .transpose()
    }

    async fn finance(
        &self,
        rider: &NewFinancedRider,
        created_by: &StaffId,
    ) -> Result<FinancedRider, RiderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rider_id = Uuid::new_v4();
        let row = new_financed_row(rider_id, rider, created_by);
        let bike_id = rider.bike_id;
        let prospect_id = rider.potential_rider_id;

        conn.transaction::<_, FinanceAbort, _>(|conn| {
            async move {
                let bike_status: Option<String> = bikes::table
                    .filter(bikes::id.eq(bike_id))
                    .select(bikes::status)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                match bike_status.as_deref() {
                    None => return Err(FinanceAbort::BikeMissing),
                    Some(status) if status != BikeStatus::Available.as_str() => {
                        return Err(FinanceAbort::BikeUnavailable(bike_id));
                    }
                    Some(_) => {}
                }

                if let Some(prospect_id) = prospect_id {
                    let prospect_status: Option<String> = potential_riders::table
                        .filter(potential_riders::id.eq(prospect_id))
                        .select(potential_riders::status)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    match prospect_status.as_deref() {
                        None => return Err(FinanceAbort::ProspectMissing),
                        Some(status) if status != RiderStatus::Potential.as_str() => {
                            return Err(FinanceAbort::ProspectAlreadyFinanced(prospect_id));
                        }
                        Some(_) => {}
                    }
                }

                diesel::insert_into(financed_riders::table)
                    .values(&row)
                    .execute(conn)
                    .await?;

                let now = Utc::now();
                diesel::update(bikes::table.filter(bikes::id.eq(bike_id)))
                    .set((
                        bikes::status.eq(BikeStatus::Financed.as_str()),
                        bikes::current_rider_id.eq(Some(rider_id)),
                        bikes::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .await?;

                if let Some(prospect_id) = prospect_id {
                    diesel::update(
                        potential_riders::table.filter(potential_riders::id.eq(prospect_id)),
                    )
                    .set((
                        potential_riders::status.eq(RiderStatus::Financed.as_str()),
                        potential_riders::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await?;

        debug!(%rider_id, %bike_id, "financing transaction committed");
        load_financed(&mut conn, &rider_id)
            .await?
            .ok_or_else(|| RiderRepositoryError::query("financed rider missing after commit"))
    }

    async fn list_financed(
        &self,
        status: Option<RiderStatus>,
    ) -> Result<Vec<FinancedRider>, RiderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = financed_riders::table
            .left_join(bikes::table)
            .select((
                FinancedRiderRow::as_select(),
                Option::<BikeSummaryRow>::as_select(),
            ))
            .order(financed_riders::created_at.desc())
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(financed_riders::status.eq(status.as_str()));
        }

        query
            .load::<(FinancedRiderRow, Option<BikeSummaryRow>)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(to_financed)
            .collect()
    }

    async fn find_financed(&self, id: &Uuid) -> Result<Option<FinancedRider>, RiderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_financed(&mut conn, id).await
    }
}
