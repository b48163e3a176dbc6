//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types fail with a
//! message when a stored enumeration value is not recognised.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Bike, BikeSummary, EmailAddress, Expense, FinancedRider, FinancingTerms, IdNumber, Introducer,
    KenyanPhone, Money, NextOfKin, Payment, PaymentRider, PotentialRider, Referee, RiderIdentity,
    SmsNotification, StaffId, StaffProfile,
};

use super::schema::{
    bikes, expenses, financed_riders, payments, potential_riders, profiles, sms_notifications,
};

fn parse_stored<T>(value: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|err| err.to_string())
}

fn phone(value: String) -> KenyanPhone {
    KenyanPhone::from_stored(value)
}

fn optional_phone(value: Option<String>) -> Option<KenyanPhone> {
    value.map(KenyanPhone::from_stored)
}

// ---------------------------------------------------------------------------
// Staff profiles
// ---------------------------------------------------------------------------

/// Row struct for reading from the profiles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl ProfileRow {
    pub(crate) fn into_profile(self) -> Result<StaffProfile, String> {
        Ok(StaffProfile {
            id: StaffId::from_uuid(self.id),
            email: EmailAddress::from_stored(self.email),
            full_name: self.full_name,
            phone: optional_phone(self.phone),
            role: parse_stored(&self.role)?,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for creating staff accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profiles)]
pub(crate) struct NewProfileRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub full_name: &'a str,
    pub role: &'a str,
    pub password_hash: &'a str,
}

// ---------------------------------------------------------------------------
// Potential riders
// ---------------------------------------------------------------------------

/// Row struct for reading from the potential_riders table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = potential_riders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PotentialRiderRow {
    pub id: Uuid,
    pub full_name: String,
    pub id_number: String,
    pub age: i32,
    pub postal_address: String,
    pub primary_phone: String,
    pub secondary_phone: Option<String>,
    pub tertiary_phone: Option<String>,
    pub introducer_name: Option<String>,
    pub introducer_id: Option<String>,
    pub introducer_phone: Option<String>,
    pub introducer_residential_area: Option<String>,
    pub introducer_previous_bike: Option<String>,
    pub preferred_bike_make: Option<String>,
    pub probable_financing_date: Option<NaiveDate>,
    pub status: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PotentialRiderRow {
    pub(crate) fn into_rider(self) -> Result<PotentialRider, String> {
        Ok(PotentialRider {
            id: self.id,
            identity: RiderIdentity {
                full_name: self.full_name,
                id_number: IdNumber::from_stored(self.id_number),
                age: self.age,
                postal_address: self.postal_address,
                primary_phone: phone(self.primary_phone),
                secondary_phone: optional_phone(self.secondary_phone),
                tertiary_phone: optional_phone(self.tertiary_phone),
            },
            introducer: Introducer {
                name: self.introducer_name,
                id: self.introducer_id,
                phone: optional_phone(self.introducer_phone),
                residential_area: self.introducer_residential_area,
                previous_bike: self.introducer_previous_bike,
            },
            preferred_bike_make: self.preferred_bike_make,
            probable_financing_date: self.probable_financing_date,
            status: parse_stored(&self.status)?,
            created_by: StaffId::from_uuid(self.created_by),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Insertable struct for creating prospects.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = potential_riders)]
pub(crate) struct NewPotentialRiderRow<'a> {
    pub id: Uuid,
    pub full_name: &'a str,
    pub id_number: &'a str,
    pub age: i32,
    pub postal_address: &'a str,
    pub primary_phone: &'a str,
    pub secondary_phone: Option<&'a str>,
    pub tertiary_phone: Option<&'a str>,
    pub introducer_name: Option<&'a str>,
    pub introducer_id: Option<&'a str>,
    pub introducer_phone: Option<&'a str>,
    pub introducer_residential_area: Option<&'a str>,
    pub introducer_previous_bike: Option<&'a str>,
    pub preferred_bike_make: Option<&'a str>,
    pub probable_financing_date: Option<NaiveDate>,
    pub status: &'a str,
    pub created_by: Uuid,
}

// ---------------------------------------------------------------------------
// Bikes
// ---------------------------------------------------------------------------

/// Row struct for reading from the bikes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bikes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BikeRow {
    pub id: Uuid,
    pub make: String,
    pub chassis_no: String,
    pub engine_no: String,
    pub registration_no: Option<String>,
    pub colour: String,
    pub purchase_date: NaiveDate,
    pub purchase_price_cents: i64,
    pub status: String,
    pub current_rider_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BikeRow {
    pub(crate) fn into_bike(self) -> Result<Bike, String> {
        Ok(Bike {
            id: self.id,
            make: self.make,
            chassis_no: self.chassis_no,
            engine_no: self.engine_no,
            registration_no: self.registration_no,
            colour: self.colour,
            purchase_date: self.purchase_date,
            purchase_price: Money::from_cents(self.purchase_price_cents),
            status: parse_stored(&self.status)?,
            current_rider_id: self.current_rider_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Bike columns shown alongside a financed rider.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bikes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BikeSummaryRow {
    pub make: String,
    pub registration_no: Option<String>,
    pub chassis_no: String,
    pub colour: String,
}

impl From<BikeSummaryRow> for BikeSummary {
    fn from(row: BikeSummaryRow) -> Self {
        Self {
            make: row.make,
            registration_no: row.registration_no,
            chassis_no: row.chassis_no,
            colour: row.colour,
        }
    }
}

/// Insertable struct for registering bikes.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bikes)]
pub(crate) struct NewBikeRow<'a> {
    pub id: Uuid,
    pub make: &'a str,
    pub chassis_no: &'a str,
    pub engine_no: &'a str,
    pub registration_no: Option<&'a str>,
    pub colour: &'a str,
    pub purchase_date: NaiveDate,
    pub purchase_price_cents: i64,
    pub status: &'a str,
}

// ---------------------------------------------------------------------------
// Financed riders
// ---------------------------------------------------------------------------

/// Row struct for reading from the financed_riders table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = financed_riders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FinancedRiderRow {
    pub id: Uuid,
    pub potential_rider_id: Option<Uuid>,
    pub bike_id: Option<Uuid>,
    pub full_name: String,
    pub id_number: String,
    pub age: i32,
    pub postal_address: String,
    pub residential_area: String,
    pub primary_phone: String,
    pub secondary_phone: Option<String>,
    pub tertiary_phone: Option<String>,
    pub next_of_kin_name: String,
    pub next_of_kin_phone: String,
    pub next_of_kin_id: String,
    pub next_of_kin_relationship: String,
    pub referee_name: Option<String>,
    pub referee_id: Option<String>,
    pub referee_phone: Option<String>,
    pub operation_slot: String,
    pub operation_slot_cost_cents: i64,
    pub daily_remittance_cents: i64,
    pub total_investment_cents: i64,
    pub expected_operation_days: i32,
    pub start_date: NaiveDate,
    pub status: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FinancedRiderRow {
    pub(crate) fn into_rider(self, bike: Option<BikeSummary>) -> Result<FinancedRider, String> {
        Ok(FinancedRider {
            id: self.id,
            potential_rider_id: self.potential_rider_id,
            bike_id: self.bike_id,
            identity: RiderIdentity {
                full_name: self.full_name,
                id_number: IdNumber::from_stored(self.id_number),
                age: self.age,
                postal_address: self.postal_address,
                primary_phone: phone(self.primary_phone),
                secondary_phone: optional_phone(self.secondary_phone),
                tertiary_phone: optional_phone(self.tertiary_phone),
            },
            residential_area: self.residential_area,
            next_of_kin: NextOfKin {
                name: self.next_of_kin_name,
                phone: phone(self.next_of_kin_phone),
                id: self.next_of_kin_id,
                relationship: self.next_of_kin_relationship,
            },
            referee: Referee {
                name: self.referee_name,
                id: self.referee_id,
                phone: optional_phone(self.referee_phone),
            },
            terms: FinancingTerms {
                operation_slot: parse_stored(&self.operation_slot)?,
                operation_slot_cost: Money::from_cents(self.operation_slot_cost_cents),
                daily_remittance: Money::from_cents(self.daily_remittance_cents),
                total_investment: Money::from_cents(self.total_investment_cents),
                expected_operation_days: self.expected_operation_days,
                start_date: self.start_date,
            },
            status: parse_stored(&self.status)?,
            created_by: self.created_by.map(StaffId::from_uuid),
            created_at: self.created_at,
            updated_at: self.updated_at,
            bike,
        })
    }
}

/// Insertable struct for financing a rider.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = financed_riders)]
pub(crate) struct NewFinancedRiderRow<'a> {
    pub id: Uuid,
    pub potential_rider_id: Option<Uuid>,
    pub bike_id: Option<Uuid>,
    pub full_name: &'a str,
    pub id_number: &'a str,
    pub age: i32,
    pub postal_address: &'a str,
    pub residential_area: &'a str,
    pub primary_phone: &'a str,
    pub secondary_phone: Option<&'a str>,
    pub tertiary_phone: Option<&'a str>,
    pub next_of_kin_name: &'a str,
    pub next_of_kin_phone: &'a str,
    pub next_of_kin_id: &'a str,
    pub next_of_kin_relationship: &'a str,
    pub referee_name: Option<&'a str>,
    pub referee_id: Option<&'a str>,
    pub referee_phone: Option<&'a str>,
    pub operation_slot: &'a str,
    pub operation_slot_cost_cents: i64,
    pub daily_remittance_cents: i64,
    pub total_investment_cents: i64,
    pub expected_operation_days: i32,
    pub start_date: NaiveDate,
    pub status: &'a str,
    pub created_by: Option<Uuid>,
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

/// Row struct for reading from the payments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PaymentRow {
    pub id: Uuid,
    pub rider_id: Uuid,
    pub amount_cents: i64,
    pub payment_date: NaiveDate,
    pub payment_method: String,
    pub status: String,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl PaymentRow {
    pub(crate) fn into_payment(self) -> Result<Payment, String> {
        Ok(Payment {
            id: self.id,
            rider_id: self.rider_id,
            amount: Money::from_cents(self.amount_cents),
            payment_date: self.payment_date,
            payment_method: parse_stored(&self.payment_method)?,
            status: parse_stored(&self.status)?,
            transaction_reference: self.transaction_reference,
            notes: self.notes,
            created_by: self.created_by.map(StaffId::from_uuid),
            created_at: self.created_at,
        })
    }
}

/// Rider columns joined onto a payment listing.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = financed_riders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PaymentRiderRow {
    pub full_name: String,
    pub id_number: String,
    pub primary_phone: String,
}

impl From<PaymentRiderRow> for PaymentRider {
    fn from(row: PaymentRiderRow) -> Self {
        Self {
            full_name: row.full_name,
            id_number: IdNumber::from_stored(row.id_number),
            primary_phone: phone(row.primary_phone),
        }
    }
}

/// Insertable struct for recording payments.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub(crate) struct NewPaymentRow<'a> {
    pub id: Uuid,
    pub rider_id: Uuid,
    pub amount_cents: i64,
    pub payment_date: NaiveDate,
    pub payment_method: &'a str,
    pub status: &'a str,
    pub transaction_reference: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub created_by: Option<Uuid>,
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

/// Row struct for reading from the expenses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = expenses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExpenseRow {
    pub id: Uuid,
    pub category: String,
    pub description: String,
    pub amount_cents: i64,
    pub expense_date: NaiveDate,
    pub reference_no: Option<String>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl ExpenseRow {
    pub(crate) fn into_expense(self) -> Result<Expense, String> {
        Ok(Expense {
            id: self.id,
            category: parse_stored(&self.category)?,
            description: self.description,
            amount: Money::from_cents(self.amount_cents),
            expense_date: self.expense_date,
            reference_no: self.reference_no,
            notes: self.notes,
            created_by: StaffId::from_uuid(self.created_by),
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for recording expenses.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = expenses)]
pub(crate) struct NewExpenseRow<'a> {
    pub id: Uuid,
    pub category: &'a str,
    pub description: &'a str,
    pub amount_cents: i64,
    pub expense_date: NaiveDate,
    pub reference_no: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub created_by: Uuid,
}

// ---------------------------------------------------------------------------
// SMS notifications
// ---------------------------------------------------------------------------

/// Row struct for reading from the sms_notifications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sms_notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SmsNotificationRow {
    pub id: Uuid,
    pub rider_id: Option<Uuid>,
    pub recipient_phone: String,
    pub message: String,
    pub message_type: String,
    pub status: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SmsNotificationRow {
    pub(crate) fn into_notification(self) -> Result<SmsNotification, String> {
        Ok(SmsNotification {
            id: self.id,
            rider_id: self.rider_id,
            recipient_phone: phone(self.recipient_phone),
            message: self.message,
            message_type: parse_stored(&self.message_type)?,
            status: parse_stored(&self.status)?,
            sent_at: self.sent_at,
            error_message: self.error_message,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for logging a pending notification.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sms_notifications)]
pub(crate) struct NewSmsNotificationRow<'a> {
    pub id: Uuid,
    pub rider_id: Option<Uuid>,
    pub recipient_phone: &'a str,
    pub message: &'a str,
    pub message_type: &'a str,
    pub status: &'a str,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{BikeStatus, StaffRole};
    use rstest::rstest;

    fn bike_row(status: &str) -> BikeRow {
        let now = Utc::now();
        BikeRow {
            id: Uuid::new_v4(),
            make: "Honda".to_owned(),
            chassis_no: "CH12345".to_owned(),
            engine_no: "EN12345".to_owned(),
            registration_no: None,
            colour: "Red".to_owned(),
            purchase_date: now.date_naive(),
            purchase_price_cents: 12_000_050,
            status: status.to_owned(),
            current_rider_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn bike_row_converts_cents_and_status() {
        let bike = bike_row("maintenance").into_bike().expect("valid row");
        assert_eq!(bike.status, BikeStatus::Maintenance);
        assert_eq!(bike.purchase_price, Money::from_cents(12_000_050));
    }

    #[rstest]
    fn unknown_stored_status_is_reported() {
        let error = bike_row("scrapped").into_bike().expect_err("unknown status");
        assert!(error.contains("scrapped"));
    }

    #[rstest]
    fn profile_row_parses_role() {
        let row = ProfileRow {
            id: Uuid::new_v4(),
            email: "admin@moto.co.ke".to_owned(),
            full_name: "Admin".to_owned(),
            phone: None,
            role: "accountant".to_owned(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_owned(),
            created_at: Utc::now(),
        };
        assert_eq!(row.into_profile().expect("valid row").role, StaffRole::Accountant);
    }
}
