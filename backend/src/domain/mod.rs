//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed entities for staff, riders, bikes,
//! payments, expenses and SMS notifications, the pure calculations over
//! them, and the services that implement the driving ports. Types validate
//! on construction; serialised field names are camelCase.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Money (alias to `money::Money`): Kenyan shillings held as cents.

pub mod bike;
pub mod contact;
pub mod error;
pub mod expense;
pub mod money;
pub mod password;
pub mod payment;
pub mod ports;
pub mod reports;
pub mod rider;
pub mod search;
pub mod sms;
pub mod staff;
pub mod trace_id;
pub mod validation;

mod bike_service;
mod expense_service;
mod payment_service;
mod report_service;
mod rider_service;
mod sms_service;
mod staff_auth_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::bike::{Bike, BikeInput, BikeStatus, BikeSummary, NewBike};
pub use self::bike_service::BikeService;
pub use self::contact::{IdNumber, KenyanPhone};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::expense::{
    CategoryTotal, DateRange, Expense, ExpenseCategory, ExpenseInput, ExpensePeriod, NewExpense,
    ProfitAnalysis, YearTotals,
};
pub use self::expense_service::ExpenseService;
pub use self::money::{Money, MoneyError};
pub use self::password::{PasswordError, PasswordHash};
pub use self::payment::{
    NewPayment, Payment, PaymentFilter, PaymentInput, PaymentMethod, PaymentProgress,
    PaymentRecord, PaymentRider, PaymentStatus, ProgressBand,
};
pub use self::payment_service::PaymentService;
pub use self::report_service::{ReportService, ReportSources};
pub use self::reports::{AnnualReport, DashboardStats, MonthlyBreakdown, ReportKpis};
pub use self::rider::{
    FinanceRiderInput, FinancedRider, FinancingTerms, IdentityInput, Introducer, NewFinancedRider,
    NewPotentialRider, NextOfKin, OperationSlot, PotentialRider, PotentialRiderInput, Referee,
    RiderIdentity, RiderStatus, UnknownVariant,
};
pub use self::rider_service::RiderService;
pub use self::search::SearchTerm;
pub use self::sms::{
    AutomationRules, AutomationSummary, MessageTemplates, OutgoingSms, RuleOutcome, SmsInput,
    SmsMessageType, SmsNotification, SmsStats, SmsStatus,
};
pub use self::sms_service::SmsService;
pub use self::staff::{
    EmailAddress, SignInCredentials, SignUpRequest, StaffId, StaffProfile, StaffRole,
    StaffSession,
};
pub use self::staff_auth_service::StaffAuthService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use motofinance::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
