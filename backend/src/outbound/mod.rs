//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **sms**: reqwest-backed SMS provider client and a log-only fallback
//!
//! Adapters translate between domain types and infrastructure
//! representations and contain no business logic.

pub mod persistence;
pub mod sms;
