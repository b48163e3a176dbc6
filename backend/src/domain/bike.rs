//! Motorcycle inventory.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::money::Money;
use super::rider::UnknownVariant;
use super::validation::{self, Field, FieldViolation};

/// Where a motorcycle is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BikeStatus {
    #[default]
    Available,
    Financed,
    Maintenance,
    Sold,
}

impl BikeStatus {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Financed => "financed",
            Self::Maintenance => "maintenance",
            Self::Sold => "sold",
        }
    }
}

impl FromStr for BikeStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "available" => Ok(Self::Available),
            "financed" => Ok(Self::Financed),
            "maintenance" => Ok(Self::Maintenance),
            "sold" => Ok(Self::Sold),
            other => Err(UnknownVariant::new("bike status", other)),
        }
    }
}

/// A motorcycle owned by the business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bike {
    pub id: Uuid,
    pub make: String,
    pub chassis_no: String,
    pub engine_no: String,
    pub registration_no: Option<String>,
    pub colour: String,
    pub purchase_date: NaiveDate,
    #[schema(value_type = f64)]
    pub purchase_price: Money,
    pub status: BikeStatus,
    pub current_rider_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bike {
    /// Only available bikes can be assigned to a new rider.
    pub fn is_available(&self) -> bool {
        self.status == BikeStatus::Available
    }
}

/// Identifying details shown next to a financed rider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BikeSummary {
    pub make: String,
    pub registration_no: Option<String>,
    pub chassis_no: String,
    pub colour: String,
}

/// Form submitted to register a motorcycle.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BikeInput {
    pub make: String,
    pub chassis_no: String,
    pub engine_no: String,
    pub registration_no: Option<String>,
    pub colour: String,
    pub purchase_date: NaiveDate,
    pub purchase_price: f64,
    #[serde(default)]
    pub status: BikeStatus,
}

/// A validated motorcycle ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBike {
    pub make: String,
    pub chassis_no: String,
    pub engine_no: String,
    pub registration_no: Option<String>,
    pub colour: String,
    pub purchase_date: NaiveDate,
    pub purchase_price: Money,
    pub status: BikeStatus,
}

const MAKE: Field = Field::new("make", "Make");
const CHASSIS_NO: Field = Field::new("chassisNo", "Chassis number");
const ENGINE_NO: Field = Field::new("engineNo", "Engine number");
const REGISTRATION_NO: Field = Field::new("registrationNo", "Registration number");
const COLOUR: Field = Field::new("colour", "Colour");
const PURCHASE_PRICE: Field = Field::new("purchasePrice", "Purchase price");

impl TryFrom<BikeInput> for NewBike {
    type Error = FieldViolation;

    fn try_from(input: BikeInput) -> Result<Self, Self::Error> {
        Ok(Self {
            make: validation::text(MAKE, &input.make, 2, 50)?,
            chassis_no: validation::text(CHASSIS_NO, &input.chassis_no, 5, 50)?,
            engine_no: validation::text(ENGINE_NO, &input.engine_no, 5, 50)?,
            registration_no: validation::optional_text(
                REGISTRATION_NO,
                input.registration_no.as_deref(),
                20,
            )?,
            colour: validation::text(COLOUR, &input.colour, 2, 30)?,
            purchase_date: input.purchase_date,
            purchase_price: validation::positive_amount(
                PURCHASE_PRICE,
                input.purchase_price,
                Money::from_whole_shillings(10_000_000),
            )?,
            status: input.status,
        })
    }
}
