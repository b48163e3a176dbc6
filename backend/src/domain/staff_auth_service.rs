//! Staff authentication service.
//!
//! Hashes passwords on sign-up and verifies them on sign-in. Unknown emails
//! and wrong passwords produce the same error.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{
    NewStaffAccount, StaffAuthentication, StaffRepository, StaffRepositoryError,
};
use crate::domain::{
    Error, PasswordError, PasswordHash, SignInCredentials, SignUpRequest, StaffId, StaffProfile,
    StaffRole,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

static DUMMY_HASH: OnceLock<Option<PasswordHash>> = OnceLock::new();

/// Hash checked when the email is unknown, so both rejections cost one
/// argon2 verification.
fn dummy_hash() -> Option<&'static PasswordHash> {
    DUMMY_HASH
        .get_or_init(|| PasswordHash::create("motofinance-unknown-account").ok())
        .as_ref()
}

/// Staff account service implementing [`StaffAuthentication`].
#[derive(Clone)]
pub struct StaffAuthService<R> {
    repo: Arc<R>,
}

impl<R> StaffAuthService<R> {
    /// Create a new service over the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn map_repository_error(error: StaffRepositoryError) -> Error {
    match error {
        StaffRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("staff repository unavailable: {message}"))
        }
        StaffRepositoryError::Query { message } => {
            Error::internal(format!("staff repository error: {message}"))
        }
        StaffRepositoryError::DuplicateEmail { email } => {
            Error::conflict(format!("an account already exists for {email}"))
        }
    }
}

fn map_password_error(error: PasswordError) -> Error {
    Error::internal(format!("password processing failed: {error}"))
}

#[async_trait]
impl<R> StaffAuthentication for StaffAuthService<R>
where
    R: StaffRepository,
{
    async fn sign_up(&self, request: SignUpRequest) -> Result<StaffProfile, Error> {
        let password_hash = PasswordHash::create(request.password()).map_err(map_password_error)?;
        let account = NewStaffAccount {
            id: StaffId::random(),
            email: request.email().clone(),
            full_name: request.full_name().to_owned(),
            role: StaffRole::RiderClerk,
            password_hash,
        };
        self.repo
            .insert(&account)
            .await
            .map_err(map_repository_error)
    }

    async fn sign_in(&self, credentials: SignInCredentials) -> Result<StaffProfile, Error> {
        let Some(record) = self
            .repo
            .find_credentials(credentials.email())
            .await
            .map_err(map_repository_error)?
        else {
            if let Some(hash) = dummy_hash() {
                let _ = hash.verify(credentials.password());
            }
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        match record.password_hash.verify(credentials.password()) {
            Ok(true) => Ok(record.profile),
            Ok(false) => Err(Error::unauthorized(INVALID_CREDENTIALS)),
            Err(PasswordError::InvalidHash) => {
                warn!(staff_id = %record.profile.id, "stored password hash is malformed");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
            Err(error) => Err(map_password_error(error)),
        }
    }

    async fn profile(&self, staff_id: StaffId) -> Result<StaffProfile, Error> {
        self.repo
            .find_by_id(&staff_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("staff account {staff_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{MockStaffRepository, StaffCredentialsRecord};
    use crate::domain::{EmailAddress, ErrorCode};
    use chrono::Utc;

    fn profile(email: &str) -> StaffProfile {
        StaffProfile {
            id: StaffId::random(),
            email: EmailAddress::from_stored(email.to_owned()),
            full_name: "Grace Wanjiru".to_owned(),
            phone: None,
            role: StaffRole::Accountant,
            created_at: Utc::now(),
        }
    }

    fn credentials(password: &str) -> SignInCredentials {
        SignInCredentials::try_from_parts("grace@moto.co.ke", password).expect("valid credentials")
    }

    #[tokio::test]
    async fn sign_up_hashes_password_and_defaults_role() {
        let mut repo = MockStaffRepository::new();
        repo.expect_insert()
            .withf(|account| {
                account.role == StaffRole::RiderClerk
                    && account.email.as_str() == "grace@moto.co.ke"
                    && account.password_hash.verify("secret1").unwrap_or(false)
            })
            .times(1)
            .returning(|account| {
                Ok(StaffProfile {
                    id: account.id,
                    email: account.email.clone(),
                    full_name: account.full_name.clone(),
                    phone: None,
                    role: account.role,
                    created_at: Utc::now(),
                })
            });
        let service = StaffAuthService::new(Arc::new(repo));
        let request =
            SignUpRequest::try_from_parts("Grace Wanjiru", "Grace@Moto.co.ke", "secret1", "secret1")
                .expect("valid request");

        let created = service.sign_up(request).await.expect("sign up succeeds");

        assert_eq!(created.role, StaffRole::RiderClerk);
        assert_eq!(created.full_name, "Grace Wanjiru");
    }

    #[tokio::test]
    async fn sign_up_reports_duplicate_email_as_conflict() {
        let mut repo = MockStaffRepository::new();
        repo.expect_insert().times(1).returning(|account| {
            Err(StaffRepositoryError::duplicate_email(account.email.as_str()))
        });
        let service = StaffAuthService::new(Arc::new(repo));
        let request =
            SignUpRequest::try_from_parts("Grace Wanjiru", "grace@moto.co.ke", "secret1", "secret1")
                .expect("valid request");

        let error = service.sign_up(request).await.expect_err("duplicate");

        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn sign_in_accepts_matching_password() {
        let stored = profile("grace@moto.co.ke");
        let expected = stored.clone();
        let hash = PasswordHash::create("secret1").expect("hash");
        let mut repo = MockStaffRepository::new();
        repo.expect_find_credentials().times(1).return_once(move |_| {
            Ok(Some(StaffCredentialsRecord {
                profile: stored,
                password_hash: hash,
            }))
        });
        let service = StaffAuthService::new(Arc::new(repo));

        let signed_in = service
            .sign_in(credentials("secret1"))
            .await
            .expect("sign in succeeds");

        assert_eq!(signed_in, expected);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let hash = PasswordHash::create("secret1").expect("hash");
        let stored = profile("grace@moto.co.ke");
        let mut known = MockStaffRepository::new();
        known.expect_find_credentials().return_once(move |_| {
            Ok(Some(StaffCredentialsRecord {
                profile: stored,
                password_hash: hash,
            }))
        });
        let mut unknown = MockStaffRepository::new();
        unknown.expect_find_credentials().return_once(|_| Ok(None));

        let wrong_password = StaffAuthService::new(Arc::new(known))
            .sign_in(credentials("not-it"))
            .await
            .expect_err("rejected");
        let missing = StaffAuthService::new(Arc::new(unknown))
            .sign_in(credentials("secret1"))
            .await
            .expect_err("rejected");

        assert_eq!(wrong_password.code(), ErrorCode::Unauthorized);
        assert_eq!(wrong_password.message(), missing.message());
        assert_eq!(missing.code(), ErrorCode::Unauthorized);
    }

    #[test]
    fn unknown_accounts_verify_against_a_real_hash() {
        let hash = dummy_hash().expect("dummy hash");
        assert!(!hash.verify("secret1").expect("verifies"));
    }

    #[tokio::test]
    async fn profile_of_removed_account_is_not_found() {
        let mut repo = MockStaffRepository::new();
        repo.expect_find_by_id().return_once(|_| Ok(None));
        let service = StaffAuthService::new(Arc::new(repo));

        let error = service
            .profile(StaffId::random())
            .await
            .expect_err("missing account");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn profile_maps_connection_failures_to_service_unavailable() {
        let mut repo = MockStaffRepository::new();
        repo.expect_find_by_id()
            .return_once(|_| Err(StaffRepositoryError::connection("pool exhausted")));
        let service = StaffAuthService::new(Arc::new(repo));

        let error = service
            .profile(StaffId::random())
            .await
            .expect_err("unavailable");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
