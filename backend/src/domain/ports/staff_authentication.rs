//! Driving port for staff sign-up and sign-in.
//!
//! Inbound adapters authenticate through this trait without touching
//! persistence, so handler tests can substitute a mock.

use async_trait::async_trait;

use crate::domain::{Error, SignInCredentials, SignUpRequest, StaffId, StaffProfile};

/// Staff account use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StaffAuthentication: Send + Sync {
    /// Create an account with the default role.
    async fn sign_up(&self, request: SignUpRequest) -> Result<StaffProfile, Error>;

    /// Check credentials and return the matching profile.
    async fn sign_in(&self, credentials: SignInCredentials) -> Result<StaffProfile, Error>;

    /// Load the profile of a signed-in staff member.
    async fn profile(&self, staff_id: StaffId) -> Result<StaffProfile, Error>;
}
