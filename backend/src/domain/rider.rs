//! Riders: prospects awaiting financing and financed customers.
//!
//! A potential rider is registered by a clerk. Financing converts the
//! prospect into a [`FinancedRider`] bound to a motorcycle with a daily
//! remittance and a total investment to repay.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::bike::BikeSummary;
use super::contact::{IdNumber, KenyanPhone};
use super::money::Money;
use super::staff::StaffId;
use super::validation::{self, Field, FieldViolation, ViolationCode};

/// Lifecycle of a rider record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiderStatus {
    Potential,
    Financed,
    Completed,
    Defaulted,
    Repossessed,
}

impl RiderStatus {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Potential => "potential",
            Self::Financed => "financed",
            Self::Completed => "completed",
            Self::Defaulted => "defaulted",
            Self::Repossessed => "repossessed",
        }
    }
}

/// Raised when a stored enum value is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

impl FromStr for RiderStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "potential" => Ok(Self::Potential),
            "financed" => Ok(Self::Financed),
            "completed" => Ok(Self::Completed),
            "defaulted" => Ok(Self::Defaulted),
            "repossessed" => Ok(Self::Repossessed),
            other => Err(UnknownVariant::new("rider status", other)),
        }
    }
}

/// Working shift assigned to a financed rider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OperationSlot {
    /// 6AM to 2PM.
    Morning,
    /// 2PM to 10PM.
    Evening,
    /// 10PM to 6AM.
    Night,
}

impl OperationSlot {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }

    /// Shift hours shown to staff.
    pub const fn hours(self) -> &'static str {
        match self {
            Self::Morning => "6AM-2PM",
            Self::Evening => "2PM-10PM",
            Self::Night => "10PM-6AM",
        }
    }
}

impl FromStr for OperationSlot {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "morning" => Ok(Self::Morning),
            "evening" => Ok(Self::Evening),
            "night" => Ok(Self::Night),
            other => Err(UnknownVariant::new("operation slot", other)),
        }
    }
}

impl fmt::Display for OperationSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Personal details shared by prospects and financed riders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RiderIdentity {
    pub full_name: String,
    #[schema(value_type = String, example = "12345678")]
    pub id_number: IdNumber,
    pub age: i32,
    pub postal_address: String,
    #[schema(value_type = String, example = "0712345678")]
    pub primary_phone: KenyanPhone,
    #[schema(value_type = Option<String>)]
    pub secondary_phone: Option<KenyanPhone>,
    #[schema(value_type = Option<String>)]
    pub tertiary_phone: Option<KenyanPhone>,
}

/// Person who introduced a prospect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Introducer {
    pub name: Option<String>,
    pub id: Option<String>,
    #[schema(value_type = Option<String>)]
    pub phone: Option<KenyanPhone>,
    pub residential_area: Option<String>,
    pub previous_bike: Option<String>,
}

/// A financing prospect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PotentialRider {
    pub id: Uuid,
    #[serde(flatten)]
    pub identity: RiderIdentity,
    pub introducer: Introducer,
    pub preferred_bike_make: Option<String>,
    pub probable_financing_date: Option<NaiveDate>,
    pub status: RiderStatus,
    #[schema(value_type = String, format = Uuid)]
    pub created_by: StaffId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Next of kin recorded for a financed rider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NextOfKin {
    pub name: String,
    #[schema(value_type = String)]
    pub phone: KenyanPhone,
    pub id: String,
    pub relationship: String,
}

/// Optional referee vouching for a financed rider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Referee {
    pub name: Option<String>,
    pub id: Option<String>,
    #[schema(value_type = Option<String>)]
    pub phone: Option<KenyanPhone>,
}

/// Repayment plan agreed when a rider is financed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancingTerms {
    pub operation_slot: OperationSlot,
    #[schema(value_type = f64)]
    pub operation_slot_cost: Money,
    #[schema(value_type = f64)]
    pub daily_remittance: Money,
    #[schema(value_type = f64)]
    pub total_investment: Money,
    pub expected_operation_days: i32,
    pub start_date: NaiveDate,
}

/// A rider under a repayment plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancedRider {
    pub id: Uuid,
    pub potential_rider_id: Option<Uuid>,
    pub bike_id: Option<Uuid>,
    #[serde(flatten)]
    pub identity: RiderIdentity,
    pub residential_area: String,
    pub next_of_kin: NextOfKin,
    pub referee: Referee,
    #[serde(flatten)]
    pub terms: FinancingTerms,
    pub status: RiderStatus,
    #[schema(value_type = Option<String>, format = Uuid)]
    pub created_by: Option<StaffId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Assigned motorcycle, when loaded alongside the rider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bike: Option<BikeSummary>,
}

const FULL_NAME: Field = Field::new("fullName", "Full name");
const ID_NUMBER: Field = Field::new("idNumber", "ID number");
const AGE: Field = Field::new("age", "Age");
const POSTAL_ADDRESS: Field = Field::new("postalAddress", "Postal address");
const PRIMARY_PHONE: Field = Field::new("primaryPhone", "Primary phone");
const SECONDARY_PHONE: Field = Field::new("secondaryPhone", "Secondary phone");
const TERTIARY_PHONE: Field = Field::new("tertiaryPhone", "Tertiary phone");
const INTRODUCER_NAME: Field = Field::new("introducerName", "Introducer name");
const INTRODUCER_ID: Field = Field::new("introducerId", "Introducer ID");
const INTRODUCER_PHONE: Field = Field::new("introducerPhone", "Introducer phone");
const INTRODUCER_AREA: Field = Field::new("introducerResidentialArea", "Introducer residential area");
const INTRODUCER_BIKE: Field = Field::new("introducerPreviousBike", "Introducer previous bike");
const PREFERRED_MAKE: Field = Field::new("preferredBikeMake", "Preferred bike make");
const RESIDENTIAL_AREA: Field = Field::new("residentialArea", "Residential area");
const KIN_NAME: Field = Field::new("nextOfKinName", "Next of kin name");
const KIN_PHONE: Field = Field::new("nextOfKinPhone", "Next of kin phone");
const KIN_ID: Field = Field::new("nextOfKinId", "Next of kin ID");
const KIN_RELATIONSHIP: Field = Field::new("nextOfKinRelationship", "Relationship");
const REFEREE_NAME: Field = Field::new("refereeName", "Referee name");
const REFEREE_ID: Field = Field::new("refereeId", "Referee ID");
const REFEREE_PHONE: Field = Field::new("refereePhone", "Referee phone");
const DAILY_REMITTANCE: Field = Field::new("dailyRemittance", "Daily remittance");
const SLOT_COST: Field = Field::new("operationSlotCost", "Operation slot cost");
const TOTAL_INVESTMENT: Field = Field::new("totalInvestment", "Total investment");
const EXPECTED_DAYS: Field = Field::new("expectedOperationDays", "Expected operation days");

/// Raw personal fields as submitted by a form.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityInput {
    pub full_name: String,
    pub id_number: String,
    pub age: i64,
    pub postal_address: String,
    pub primary_phone: String,
    pub secondary_phone: Option<String>,
    pub tertiary_phone: Option<String>,
}

impl TryFrom<&IdentityInput> for RiderIdentity {
    type Error = FieldViolation;

    fn try_from(input: &IdentityInput) -> Result<Self, Self::Error> {
        Ok(Self {
            full_name: validation::text(FULL_NAME, &input.full_name, 2, 100)?,
            id_number: IdNumber::parse(ID_NUMBER, &input.id_number)?,
            age: age(input.age)?,
            postal_address: validation::text(POSTAL_ADDRESS, &input.postal_address, 5, 200)?,
            primary_phone: KenyanPhone::parse(PRIMARY_PHONE, &input.primary_phone)?,
            secondary_phone: KenyanPhone::parse_optional(
                SECONDARY_PHONE,
                input.secondary_phone.as_deref(),
            )?,
            tertiary_phone: KenyanPhone::parse_optional(
                TERTIARY_PHONE,
                input.tertiary_phone.as_deref(),
            )?,
        })
    }
}

fn age(value: i64) -> Result<i32, FieldViolation> {
    let checked = validation::int_in_range(AGE, value, 18, 100)?;
    i32::try_from(checked).map_err(|_| {
        FieldViolation::new(AGE, ViolationCode::OutOfRange, "Age must be between 18 and 100")
    })
}

/// Form submitted to register a prospect.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PotentialRiderInput {
    #[serde(flatten)]
    pub identity: IdentityInput,
    pub introducer_name: Option<String>,
    pub introducer_id: Option<String>,
    pub introducer_phone: Option<String>,
    pub introducer_residential_area: Option<String>,
    pub introducer_previous_bike: Option<String>,
    pub preferred_bike_make: Option<String>,
    pub probable_financing_date: Option<NaiveDate>,
}

/// A validated prospect ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPotentialRider {
    pub identity: RiderIdentity,
    pub introducer: Introducer,
    pub preferred_bike_make: Option<String>,
    pub probable_financing_date: Option<NaiveDate>,
}

impl TryFrom<PotentialRiderInput> for NewPotentialRider {
    type Error = FieldViolation;

    fn try_from(input: PotentialRiderInput) -> Result<Self, Self::Error> {
        let identity = RiderIdentity::try_from(&input.identity)?;
        let introducer = Introducer {
            name: validation::optional_text(INTRODUCER_NAME, input.introducer_name.as_deref(), 100)?,
            id: validation::optional_text(INTRODUCER_ID, input.introducer_id.as_deref(), 20)?,
            phone: KenyanPhone::parse_optional(INTRODUCER_PHONE, input.introducer_phone.as_deref())?,
            residential_area: validation::optional_text(
                INTRODUCER_AREA,
                input.introducer_residential_area.as_deref(),
                200,
            )?,
            previous_bike: validation::optional_text(
                INTRODUCER_BIKE,
                input.introducer_previous_bike.as_deref(),
                100,
            )?,
        };
        Ok(Self {
            identity,
            introducer,
            preferred_bike_make: validation::optional_text(
                PREFERRED_MAKE,
                input.preferred_bike_make.as_deref(),
                100,
            )?,
            probable_financing_date: input.probable_financing_date,
        })
    }
}

/// Form submitted to finance a rider.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinanceRiderInput {
    /// Prospect being converted, if the rider was registered beforehand.
    pub potential_rider_id: Option<Uuid>,
    pub bike_id: Uuid,
    #[serde(flatten)]
    pub identity: IdentityInput,
    pub residential_area: String,
    pub next_of_kin_name: String,
    pub next_of_kin_phone: String,
    pub next_of_kin_id: String,
    pub next_of_kin_relationship: String,
    pub referee_name: Option<String>,
    pub referee_id: Option<String>,
    pub referee_phone: Option<String>,
    pub operation_slot: OperationSlot,
    pub operation_slot_cost: f64,
    pub daily_remittance: f64,
    pub total_investment: f64,
    pub expected_operation_days: i64,
    pub start_date: NaiveDate,
}

/// A validated financing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFinancedRider {
    pub potential_rider_id: Option<Uuid>,
    pub bike_id: Uuid,
    pub identity: RiderIdentity,
    pub residential_area: String,
    pub next_of_kin: NextOfKin,
    pub referee: Referee,
    pub terms: FinancingTerms,
}

impl TryFrom<FinanceRiderInput> for NewFinancedRider {
    type Error = FieldViolation;

    fn try_from(input: FinanceRiderInput) -> Result<Self, Self::Error> {
        let identity = RiderIdentity::try_from(&input.identity)?;
        let next_of_kin = NextOfKin {
            name: validation::text(KIN_NAME, &input.next_of_kin_name, 2, 100)?,
            phone: KenyanPhone::parse(KIN_PHONE, &input.next_of_kin_phone)?,
            id: validation::text(KIN_ID, &input.next_of_kin_id, 1, 20)?,
            relationship: validation::text(KIN_RELATIONSHIP, &input.next_of_kin_relationship, 2, 50)?,
        };
        let referee = Referee {
            name: validation::optional_text(REFEREE_NAME, input.referee_name.as_deref(), 100)?,
            id: validation::optional_text(REFEREE_ID, input.referee_id.as_deref(), 20)?,
            phone: KenyanPhone::parse_optional(REFEREE_PHONE, input.referee_phone.as_deref())?,
        };
        let expected_days = validation::int_in_range(
            EXPECTED_DAYS,
            input.expected_operation_days,
            1,
            3650,
        )?;
        let terms = FinancingTerms {
            operation_slot: input.operation_slot,
            operation_slot_cost: validation::non_negative_amount(
                SLOT_COST,
                input.operation_slot_cost,
                Money::from_whole_shillings(100_000),
            )?,
            daily_remittance: validation::positive_amount(
                DAILY_REMITTANCE,
                input.daily_remittance,
                Money::from_whole_shillings(100_000),
            )?,
            total_investment: validation::positive_amount(
                TOTAL_INVESTMENT,
                input.total_investment,
                Money::from_whole_shillings(10_000_000),
            )?,
            expected_operation_days: i32::try_from(expected_days).map_err(|_| {
                FieldViolation::new(EXPECTED_DAYS, ViolationCode::OutOfRange, "Expected operation days is out of range")
            })?,
            start_date: input.start_date,
        };
        Ok(Self {
            potential_rider_id: input.potential_rider_id,
            bike_id: input.bike_id,
            identity,
            residential_area: validation::text(RESIDENTIAL_AREA, &input.residential_area, 2, 200)?,
            next_of_kin,
            referee,
            terms,
        })
    }
}
