//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each repository implements one driven port from `domain::ports` over a
//! shared `bb8` pool of `diesel-async` connections. Row structs
//! (`models.rs`) and table definitions (`schema.rs`) stay private to this
//! module; money is stored as integer cents and enumerations as checked
//! text columns.
//!
//! # Example
//!
//! ```ignore
//! use motofinance::outbound::persistence::{DbPool, DieselBikeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/motofinance")).await?;
//! let bikes = DieselBikeRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_bike_repository;
mod diesel_expense_repository;
mod diesel_payment_repository;
mod diesel_rider_repository;
mod diesel_sms_repository;
mod diesel_staff_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_bike_repository::DieselBikeRepository;
pub use diesel_expense_repository::DieselExpenseRepository;
pub use diesel_payment_repository::DieselPaymentRepository;
pub use diesel_rider_repository::DieselRiderRepository;
pub use diesel_sms_repository::DieselSmsRepository;
pub use diesel_staff_repository::DieselStaffRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
