//! Staff accounts: identities, roles and sign-in/sign-up inputs.
//!
//! Handlers hand raw strings to the constructors here; the resulting values
//! are validated and safe to pass to ports.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::contact::KenyanPhone;
use super::validation::{self, Field, FieldViolation, ViolationCode};

const EMAIL: Field = Field::new("email", "Email");
const PASSWORD: Field = Field::new("password", "Password");
const CONFIRM_PASSWORD: Field = Field::new("confirmPassword", "Password confirmation");
const FULL_NAME: Field = Field::new("fullName", "Full name");

/// Minimum password length accepted at sign-up and sign-in.
pub const PASSWORD_MIN: usize = 6;
const EMAIL_MAX: usize = 255;

/// Identifier of a staff account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct StaffId(Uuid);

impl StaffId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What a staff member may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Admin,
    Accountant,
    RiderClerk,
}

impl StaffRole {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Accountant => "accountant",
            Self::RiderClerk => "rider_clerk",
        }
    }

    /// Expenses and annual reports are restricted to finance roles.
    pub const fn can_view_finances(self) -> bool {
        matches!(self, Self::Admin | Self::Accountant)
    }
}

/// Raised when a stored role string is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown staff role: {0}")]
pub struct UnknownStaffRole(pub String);

impl FromStr for StaffRole {
    type Err = UnknownStaffRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "accountant" => Ok(Self::Accountant),
            "rider_clerk" => Ok(Self::RiderClerk),
            other => Err(UnknownStaffRole(other.to_owned())),
        }
    }
}

/// Lowercased, trimmed email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate an email address.
    pub fn parse(raw: &str) -> Result<Self, FieldViolation> {
        let value = raw.trim().to_lowercase();
        if value.is_empty() {
            return Err(FieldViolation::new(
                EMAIL,
                ViolationCode::Required,
                "Email is required",
            ));
        }
        if value.chars().count() > EMAIL_MAX {
            return Err(FieldViolation::new(
                EMAIL,
                ViolationCode::TooLong,
                format!("Email must be less than {EMAIL_MAX} characters"),
            ));
        }
        if !looks_like_email(&value) {
            return Err(FieldViolation::new(
                EMAIL,
                ViolationCode::InvalidFormat,
                "Invalid email address",
            ));
        }
        Ok(Self(value))
    }

    /// Rehydrate a stored address.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}

/// Validated sign-in input.
///
/// ## Invariants
/// - `email` is a valid lowercased address.
/// - `password` is at least [`PASSWORD_MIN`] characters and kept verbatim.
///
/// # Examples
/// ```
/// use motofinance::domain::SignInCredentials;
///
/// let creds = SignInCredentials::try_from_parts(" Clerk@Moto.co.ke ", "secret1").unwrap();
/// assert_eq!(creds.email().as_str(), "clerk@moto.co.ke");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl SignInCredentials {
    /// Validate raw sign-in fields.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, FieldViolation> {
        let email = EmailAddress::parse(email)?;
        check_password(PASSWORD, password)?;
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Address used for the account lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    full_name: String,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl SignUpRequest {
    /// Validate raw sign-up fields, including the password confirmation.
    pub fn try_from_parts(
        full_name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Self, FieldViolation> {
        let full_name = validation::text(FULL_NAME, full_name, 2, 100)?;
        let email = EmailAddress::parse(email)?;
        check_password(PASSWORD, password)?;
        if password != confirm_password {
            return Err(FieldViolation::new(
                CONFIRM_PASSWORD,
                ViolationCode::Mismatch,
                "Passwords do not match",
            ));
        }
        Ok(Self {
            full_name,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

fn check_password(field: Field, password: &str) -> Result<(), FieldViolation> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(FieldViolation::new(
            field,
            ViolationCode::TooShort,
            format!("Password must be at least {PASSWORD_MIN} characters"),
        ));
    }
    Ok(())
}

/// Public view of a staff account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfile {
    #[schema(value_type = String, format = Uuid)]
    pub id: StaffId,
    #[schema(value_type = String, example = "clerk@motofinance.co.ke")]
    pub email: EmailAddress,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<KenyanPhone>,
    pub role: StaffRole,
    pub created_at: DateTime<Utc>,
}

/// The signed-in staff member as carried in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffSession {
    pub staff_id: StaffId,
    pub role: StaffRole,
}

impl From<&StaffProfile> for StaffSession {
    fn from(profile: &StaffProfile) -> Self {
        Self {
            staff_id: profile.id,
            role: profile.role,
        }
    }
}
