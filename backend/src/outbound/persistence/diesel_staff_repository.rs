//! PostgreSQL-backed `StaffRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    NewStaffAccount, StaffCredentialsRecord, StaffRepository, StaffRepositoryError,
};
use crate::domain::{EmailAddress, PasswordHash, StaffId, StaffProfile};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{NewProfileRow, ProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::profiles;

/// Diesel-backed staff account store.
#[derive(Clone)]
pub struct DieselStaffRepository {
    pool: DbPool,
}

impl DieselStaffRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StaffRepositoryError {
    map_basic_pool_error(error, StaffRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> StaffRepositoryError {
    map_basic_diesel_error(
        error,
        StaffRepositoryError::query,
        StaffRepositoryError::connection,
    )
}

fn row_to_profile(row: ProfileRow) -> Result<StaffProfile, StaffRepositoryError> {
    row.into_profile().map_err(StaffRepositoryError::query)
}

#[async_trait]
impl StaffRepository for DieselStaffRepository {
    async fn insert(&self, account: &NewStaffAccount) -> Result<StaffProfile, StaffRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewProfileRow {
            id: *account.id.as_uuid(),
            email: account.email.as_str(),
            full_name: &account.full_name,
            role: account.role.as_str(),
            password_hash: account.password_hash.as_str(),
        };

        let inserted = diesel::insert_into(profiles::table)
            .values(&row)
            .returning(ProfileRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| {
                if unique_violation(&error).is_some() {
                    StaffRepositoryError::duplicate_email(account.email.as_str())
                } else {
                    map_diesel_error(error)
                }
            })?;
        row_to_profile(inserted)
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StaffCredentialsRecord>, StaffRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = profiles::table
            .filter(profiles::email.eq(email.as_str()))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| {
            let password_hash = PasswordHash::from_stored(row.password_hash.clone());
            row_to_profile(row).map(|profile| StaffCredentialsRecord {
                profile,
                password_hash,
            })
        })
        .transpose()
    }

    async fn find_by_id(&self, id: &StaffId) -> Result<Option<StaffProfile>, StaffRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        profiles::table
            .filter(profiles::id.eq(id.as_uuid()))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_profile)
            .transpose()
    }
}
