//! Port for staff account persistence.

use async_trait::async_trait;

use crate::domain::{EmailAddress, PasswordHash, StaffId, StaffProfile, StaffRole};

use super::define_port_error;

define_port_error! {
    /// Errors raised by staff repository adapters.
    pub enum StaffRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "staff repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "staff repository query failed: {message}",
        /// An account with this email already exists.
        DuplicateEmail { email: String } =>
            "staff account already exists for {email}",
    }
}

/// Account row to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStaffAccount {
    pub id: StaffId,
    pub email: EmailAddress,
    pub full_name: String,
    pub role: StaffRole,
    pub password_hash: PasswordHash,
}

/// Profile plus the stored hash, used only to verify a sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffCredentialsRecord {
    pub profile: StaffProfile,
    pub password_hash: PasswordHash,
}

/// Port for reading and writing staff accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Insert a new account.
    async fn insert(&self, account: &NewStaffAccount) -> Result<StaffProfile, StaffRepositoryError>;

    /// Look up an account by email for credential checks.
    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StaffCredentialsRecord>, StaffRepositoryError>;

    /// Load a profile by id.
    async fn find_by_id(&self, id: &StaffId) -> Result<Option<StaffProfile>, StaffRepositoryError>;
}
