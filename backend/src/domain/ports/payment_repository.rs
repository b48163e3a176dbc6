//! Port for payment persistence.

use async_trait::async_trait;

use crate::domain::{NewPayment, Payment, PaymentFilter, PaymentRecord, StaffId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment repository adapters.
    pub enum PaymentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "payment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "payment repository query failed: {message}",
    }
}

/// Port for reading and writing payments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Store a completed payment.
    async fn insert(
        &self,
        payment: &NewPayment,
        created_by: &StaffId,
    ) -> Result<Payment, PaymentRepositoryError>;

    /// Payments matching `filter`, joined with their rider, ordered by
    /// payment date then creation time, newest first.
    async fn list(&self, filter: &PaymentFilter)
    -> Result<Vec<PaymentRecord>, PaymentRepositoryError>;
}
