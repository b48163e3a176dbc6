//! Driving ports for repayments.

use async_trait::async_trait;

use crate::domain::{Error, NewPayment, Payment, PaymentProgress, PaymentRecord, SearchTerm, StaffId};

/// Payment mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentCommand: Send + Sync {
    /// Record a completed payment for an existing rider.
    async fn record(&self, payment: NewPayment, staff_id: StaffId) -> Result<Payment, Error>;
}

/// Payment reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentQuery: Send + Sync {
    /// Payments with rider details matching `search`.
    async fn list(&self, search: SearchTerm) -> Result<Vec<PaymentRecord>, Error>;

    /// Repayment progress of every active financed rider matching `search`.
    async fn progress(&self, search: SearchTerm) -> Result<Vec<PaymentProgress>, Error>;
}
