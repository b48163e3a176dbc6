//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`SmsGateway`]) are implemented by outbound
//! adapters. Driving ports (`*Command`, `*Query`, [`StaffAuthentication`])
//! are implemented by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod bike_ports;
mod bike_repository;
mod expense_ports;
mod expense_repository;
mod payment_ports;
mod payment_repository;
mod report_query;
mod rider_ports;
mod rider_repository;
mod sms_gateway;
mod sms_ports;
mod sms_repository;
mod staff_authentication;
mod staff_repository;

#[cfg(test)]
pub use bike_ports::{MockBikeCommand, MockBikeQuery};
pub use bike_ports::{BikeCommand, BikeQuery};
#[cfg(test)]
pub use bike_repository::MockBikeRepository;
pub use bike_repository::{BikeRepository, BikeRepositoryError};
#[cfg(test)]
pub use expense_ports::{MockExpenseCommand, MockExpenseQuery};
pub use expense_ports::{ExpenseCommand, ExpenseListing, ExpenseQuery};
#[cfg(test)]
pub use expense_repository::MockExpenseRepository;
pub use expense_repository::{ExpenseRepository, ExpenseRepositoryError};
#[cfg(test)]
pub use payment_ports::{MockPaymentCommand, MockPaymentQuery};
pub use payment_ports::{PaymentCommand, PaymentQuery};
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
pub use payment_repository::{PaymentRepository, PaymentRepositoryError};
#[cfg(test)]
pub use report_query::MockReportQuery;
pub use report_query::ReportQuery;
#[cfg(test)]
pub use rider_ports::{MockRiderCommand, MockRiderQuery};
pub use rider_ports::{RiderCommand, RiderQuery};
#[cfg(test)]
pub use rider_repository::MockRiderRepository;
pub use rider_repository::{RiderRepository, RiderRepositoryError};
#[cfg(test)]
pub use sms_gateway::MockSmsGateway;
pub use sms_gateway::{SmsGateway, SmsGatewayError};
#[cfg(test)]
pub use sms_ports::{MockSmsCommand, MockSmsQuery};
pub use sms_ports::{SmsCommand, SmsLog, SmsQuery};
#[cfg(test)]
pub use sms_repository::MockSmsRepository;
pub use sms_repository::{SmsRepository, SmsRepositoryError};
#[cfg(test)]
pub use staff_authentication::MockStaffAuthentication;
pub use staff_authentication::StaffAuthentication;
#[cfg(test)]
pub use staff_repository::MockStaffRepository;
pub use staff_repository::{
    NewStaffAccount, StaffCredentialsRecord, StaffRepository, StaffRepositoryError,
};
