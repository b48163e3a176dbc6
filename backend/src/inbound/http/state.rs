//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    BikeCommand, BikeQuery, BikeRepository, ExpenseCommand, ExpenseQuery, ExpenseRepository,
    PaymentCommand, PaymentQuery, PaymentRepository, ReportQuery, RiderCommand, RiderQuery,
    RiderRepository, SmsCommand, SmsGateway, SmsQuery, SmsRepository, StaffAuthentication,
    StaffRepository,
};
use crate::domain::{
    BikeService, ExpenseService, MessageTemplates, PaymentService, ReportService, ReportSources,
    RiderService, SmsService, StaffAuthService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn StaffAuthentication>,
    pub riders: Arc<dyn RiderCommand>,
    pub riders_query: Arc<dyn RiderQuery>,
    pub bikes: Arc<dyn BikeCommand>,
    pub bikes_query: Arc<dyn BikeQuery>,
    pub payments: Arc<dyn PaymentCommand>,
    pub payments_query: Arc<dyn PaymentQuery>,
    pub expenses: Arc<dyn ExpenseCommand>,
    pub expenses_query: Arc<dyn ExpenseQuery>,
    pub reports: Arc<dyn ReportQuery>,
    pub sms: Arc<dyn SmsCommand>,
    pub sms_query: Arc<dyn SmsQuery>,
}

/// Repository adapters shared by the domain services.
pub struct Repositories<St, Ri, Bi, Pa, Ex, Sm> {
    pub staff: Arc<St>,
    pub riders: Arc<Ri>,
    pub bikes: Arc<Bi>,
    pub payments: Arc<Pa>,
    pub expenses: Arc<Ex>,
    pub sms: Arc<Sm>,
}

impl HttpState {
    /// Wire the domain services over `repos` and expose them as ports.
    pub fn from_repositories<St, Ri, Bi, Pa, Ex, Sm>(
        repos: Repositories<St, Ri, Bi, Pa, Ex, Sm>,
        gateway: Arc<dyn SmsGateway>,
        templates: MessageTemplates,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        St: StaffRepository + 'static,
        Ri: RiderRepository + 'static,
        Bi: BikeRepository + 'static,
        Pa: PaymentRepository + 'static,
        Ex: ExpenseRepository + 'static,
        Sm: SmsRepository + 'static,
    {
        let Repositories {
            staff,
            riders,
            bikes,
            payments,
            expenses,
            sms,
        } = repos;

        let rider_service = Arc::new(RiderService::new(riders.clone(), bikes.clone()));
        let bike_service = Arc::new(BikeService::new(bikes.clone()));
        let payment_service = Arc::new(PaymentService::new(
            payments.clone(),
            riders.clone(),
            clock.clone(),
        ));
        let expense_service = Arc::new(ExpenseService::new(
            expenses.clone(),
            payments.clone(),
            clock.clone(),
        ));
        let report_service = Arc::new(ReportService::new(
            ReportSources {
                riders: riders.clone(),
                bikes,
                payments: payments.clone(),
                expenses,
            },
            clock.clone(),
        ));
        let sms_service = Arc::new(
            SmsService::new(sms, gateway, riders, payments, clock).with_templates(templates),
        );

        Self {
            auth: Arc::new(StaffAuthService::new(staff)),
            riders: rider_service.clone(),
            riders_query: rider_service,
            bikes: bike_service.clone(),
            bikes_query: bike_service,
            payments: payment_service.clone(),
            payments_query: payment_service,
            expenses: expense_service.clone(),
            expenses_query: expense_service,
            reports: report_service,
            sms: sms_service.clone(),
            sms_query: sms_service,
        }
    }
}
