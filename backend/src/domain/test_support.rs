//! Row builders shared by domain unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use super::bike::{Bike, BikeStatus};
use super::contact::{IdNumber, KenyanPhone};
use super::expense::{Expense, ExpenseCategory};
use super::money::Money;
use super::payment::{Payment, PaymentMethod, PaymentStatus};
use super::rider::{
    FinancedRider, FinancingTerms, Introducer, NewFinancedRider, NextOfKin, OperationSlot,
    PotentialRider, Referee, RiderIdentity, RiderStatus,
};
use super::staff::StaffId;

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Clock frozen at 09:30 UTC on `day`.
pub(crate) fn fixture_clock(day: NaiveDate) -> Arc<dyn Clock> {
    let utc_now = Utc.from_utc_datetime(&day.and_hms_opt(9, 30, 0).unwrap_or_default());
    Arc::new(FixtureClock { utc_now })
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

fn midnight(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0).unwrap_or_default())
}

fn identity(name: &str) -> RiderIdentity {
    RiderIdentity {
        full_name: name.to_owned(),
        id_number: IdNumber::from_stored("12345678".to_owned()),
        age: 30,
        postal_address: "P.O. Box 1, Nairobi".to_owned(),
        primary_phone: KenyanPhone::from_stored("0712345678".to_owned()),
        secondary_phone: None,
        tertiary_phone: None,
    }
}

fn terms(investment: i64, start_date: NaiveDate) -> FinancingTerms {
    FinancingTerms {
        operation_slot: OperationSlot::Morning,
        operation_slot_cost: Money::ZERO,
        daily_remittance: Money::from_whole_shillings(350),
        total_investment: Money::from_whole_shillings(investment),
        expected_operation_days: 366,
        start_date,
    }
}

fn next_of_kin() -> NextOfKin {
    NextOfKin {
        name: "Kin".to_owned(),
        phone: KenyanPhone::from_stored("0722000000".to_owned()),
        id: "1234567".to_owned(),
        relationship: "sibling".to_owned(),
    }
}

pub(crate) fn potential_rider(name: &str, status: RiderStatus) -> PotentialRider {
    let now = Utc::now();
    PotentialRider {
        id: Uuid::new_v4(),
        identity: identity(name),
        introducer: Introducer::default(),
        preferred_bike_make: None,
        probable_financing_date: None,
        status,
        created_by: StaffId::random(),
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn new_financed_rider(
    potential_rider_id: Option<Uuid>,
    bike_id: Uuid,
    start_date: NaiveDate,
) -> NewFinancedRider {
    NewFinancedRider {
        potential_rider_id,
        bike_id,
        identity: identity("Otieno Ouma"),
        residential_area: "Kibera".to_owned(),
        next_of_kin: next_of_kin(),
        referee: Referee::default(),
        terms: terms(150_000, start_date),
    }
}

pub(crate) fn financed_rider(name: &str, investment: i64, start_date: NaiveDate) -> FinancedRider {
    financed_rider_created(name, investment, start_date, start_date)
}

pub(crate) fn financed_rider_created(
    name: &str,
    investment: i64,
    start_date: NaiveDate,
    created_on: NaiveDate,
) -> FinancedRider {
    FinancedRider {
        id: Uuid::new_v4(),
        potential_rider_id: None,
        bike_id: Some(Uuid::new_v4()),
        identity: identity(name),
        residential_area: "Kibera".to_owned(),
        next_of_kin: next_of_kin(),
        referee: Referee::default(),
        terms: terms(investment, start_date),
        status: RiderStatus::Financed,
        created_by: Some(StaffId::random()),
        created_at: midnight(created_on),
        updated_at: midnight(created_on),
        bike: None,
    }
}

pub(crate) fn payment(
    rider_id: Uuid,
    shillings: i64,
    payment_date: NaiveDate,
    status: PaymentStatus,
) -> Payment {
    Payment {
        id: Uuid::new_v4(),
        rider_id,
        amount: Money::from_whole_shillings(shillings),
        payment_date,
        payment_method: PaymentMethod::Mpesa,
        status,
        transaction_reference: None,
        notes: None,
        created_by: None,
        created_at: midnight(payment_date),
    }
}

pub(crate) fn expense(category: ExpenseCategory, shillings: i64, expense_date: NaiveDate) -> Expense {
    Expense {
        id: Uuid::new_v4(),
        category,
        description: "Operating cost".to_owned(),
        amount: Money::from_whole_shillings(shillings),
        expense_date,
        reference_no: None,
        notes: None,
        created_by: StaffId::random(),
        created_at: midnight(expense_date),
    }
}

pub(crate) fn bike(status: BikeStatus) -> Bike {
    let now = Utc::now();
    Bike {
        id: Uuid::new_v4(),
        make: "Honda".to_owned(),
        chassis_no: format!("CH{}", Uuid::new_v4().simple()),
        engine_no: format!("EN{}", Uuid::new_v4().simple()),
        registration_no: None,
        colour: "Black".to_owned(),
        purchase_date: now.date_naive(),
        purchase_price: Money::from_whole_shillings(120_000),
        status,
        current_rider_id: None,
        created_at: now,
        updated_at: now,
    }
}
