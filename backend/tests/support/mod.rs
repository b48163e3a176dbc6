//! In-memory driven port implementations for end-to-end HTTP tests.
//!
//! Financing and payment recording are not modelled; those writes report a
//! query failure so a test touching them fails loudly.

use std::sync::{Arc, Mutex, MutexGuard};

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use motofinance::domain::ports::{
    BikeRepository, BikeRepositoryError, ExpenseRepository, ExpenseRepositoryError,
    NewStaffAccount, PaymentRepository, PaymentRepositoryError, RiderRepository,
    RiderRepositoryError, SmsRepository, SmsRepositoryError, StaffCredentialsRecord,
    StaffRepository, StaffRepositoryError,
};
use motofinance::domain::{
    Bike, DateRange, EmailAddress, Expense, FinancedRider, MessageTemplates, NewBike, NewExpense,
    NewFinancedRider, NewPayment, NewPotentialRider, OutgoingSms, PasswordHash, Payment,
    PaymentFilter, PaymentRecord, PotentialRider, RiderStatus, SmsMessageType, SmsNotification,
    SmsStatus, StaffId, StaffProfile, StaffRole,
};
use motofinance::inbound::http::state::{HttpState, Repositories};
use motofinance::outbound::sms::LoggingSmsGateway;
use uuid::Uuid;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().expect("in-memory store lock")
}

#[derive(Default)]
pub struct InMemoryStaff {
    accounts: Mutex<Vec<StaffCredentialsRecord>>,
}

impl InMemoryStaff {
    /// Seed an account directly, bypassing sign-up's default role.
    pub fn seed(&self, email: &str, password: &str, role: StaffRole) {
        let profile = StaffProfile {
            id: StaffId::random(),
            email: EmailAddress::parse(email).expect("valid seed email"),
            full_name: "Seeded Staff".to_owned(),
            phone: None,
            role,
            created_at: Utc::now(),
        };
        let password_hash = PasswordHash::create(password).expect("hash seed password");
        lock(&self.accounts).push(StaffCredentialsRecord {
            profile,
            password_hash,
        });
    }
}

#[async_trait]
impl StaffRepository for InMemoryStaff {
    async fn insert(&self, account: &NewStaffAccount) -> Result<StaffProfile, StaffRepositoryError> {
        let mut accounts = lock(&self.accounts);
        if accounts
            .iter()
            .any(|record| record.profile.email == account.email)
        {
            return Err(StaffRepositoryError::duplicate_email(
                account.email.as_str().to_owned(),
            ));
        }
        let profile = StaffProfile {
            id: account.id,
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            phone: None,
            role: account.role,
            created_at: Utc::now(),
        };
        accounts.push(StaffCredentialsRecord {
            profile: profile.clone(),
            password_hash: account.password_hash.clone(),
        });
        Ok(profile)
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StaffCredentialsRecord>, StaffRepositoryError> {
        Ok(lock(&self.accounts)
            .iter()
            .find(|record| &record.profile.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &StaffId) -> Result<Option<StaffProfile>, StaffRepositoryError> {
        Ok(lock(&self.accounts)
            .iter()
            .find(|record| &record.profile.id == id)
            .map(|record| record.profile.clone()))
    }
}

#[derive(Default)]
pub struct InMemoryRiders {
    potential: Mutex<Vec<PotentialRider>>,
}

#[async_trait]
impl RiderRepository for InMemoryRiders {
    async fn insert_potential(
        &self,
        rider: &NewPotentialRider,
        created_by: &StaffId,
    ) -> Result<PotentialRider, RiderRepositoryError> {
        let now = Utc::now();
        let stored = PotentialRider {
            id: Uuid::new_v4(),
            identity: rider.identity.clone(),
            introducer: rider.introducer.clone(),
            preferred_bike_make: rider.preferred_bike_make.clone(),
            probable_financing_date: rider.probable_financing_date,
            status: RiderStatus::Potential,
            created_by: *created_by,
            created_at: now,
            updated_at: now,
        };
        lock(&self.potential).push(stored.clone());
        Ok(stored)
    }

    async fn list_potential(&self) -> Result<Vec<PotentialRider>, RiderRepositoryError> {
        Ok(lock(&self.potential).clone())
    }

    async fn find_potential(
        &self,
        id: &Uuid,
    ) -> Result<Option<PotentialRider>, RiderRepositoryError> {
        Ok(lock(&self.potential)
            .iter()
            .find(|rider| &rider.id == id)
            .cloned())
    }

    async fn finance(
        &self,
        _rider: &NewFinancedRider,
        _created_by: &StaffId,
    ) -> Result<FinancedRider, RiderRepositoryError> {
        Err(RiderRepositoryError::query("financing is not modelled in memory"))
    }

    async fn list_financed(
        &self,
        _status: Option<RiderStatus>,
    ) -> Result<Vec<FinancedRider>, RiderRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_financed(
        &self,
        _id: &Uuid,
    ) -> Result<Option<FinancedRider>, RiderRepositoryError> {
        Ok(None)
    }
}

#[derive(Default)]
pub struct InMemoryBikes {
    bikes: Mutex<Vec<Bike>>,
}

#[async_trait]
impl BikeRepository for InMemoryBikes {
    async fn insert(&self, bike: &NewBike) -> Result<Bike, BikeRepositoryError> {
        let now = Utc::now();
        let stored = Bike {
            id: Uuid::new_v4(),
            make: bike.make.clone(),
            chassis_no: bike.chassis_no.clone(),
            engine_no: bike.engine_no.clone(),
            registration_no: bike.registration_no.clone(),
            colour: bike.colour.clone(),
            purchase_date: bike.purchase_date,
            purchase_price: bike.purchase_price,
            status: bike.status,
            current_rider_id: None,
            created_at: now,
            updated_at: now,
        };
        lock(&self.bikes).push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<Bike>, BikeRepositoryError> {
        Ok(lock(&self.bikes).clone())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Bike>, BikeRepositoryError> {
        Ok(lock(&self.bikes).iter().find(|bike| &bike.id == id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryPayments;

#[async_trait]
impl PaymentRepository for InMemoryPayments {
    async fn insert(
        &self,
        _payment: &NewPayment,
        _created_by: &StaffId,
    ) -> Result<Payment, PaymentRepositoryError> {
        Err(PaymentRepositoryError::query("payments are not modelled in memory"))
    }

    async fn list(
        &self,
        _filter: &PaymentFilter,
    ) -> Result<Vec<PaymentRecord>, PaymentRepositoryError> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
pub struct InMemoryExpenses {
    expenses: Mutex<Vec<Expense>>,
}

#[async_trait]
impl ExpenseRepository for InMemoryExpenses {
    async fn insert(
        &self,
        expense: &NewExpense,
        created_by: &StaffId,
    ) -> Result<Expense, ExpenseRepositoryError> {
        let stored = Expense {
            id: Uuid::new_v4(),
            category: expense.category,
            description: expense.description.clone(),
            amount: expense.amount,
            expense_date: expense.expense_date,
            reference_no: expense.reference_no.clone(),
            notes: expense.notes.clone(),
            created_by: *created_by,
            created_at: Utc::now(),
        };
        lock(&self.expenses).push(stored.clone());
        Ok(stored)
    }

    async fn list(&self, range: Option<DateRange>) -> Result<Vec<Expense>, ExpenseRepositoryError> {
        Ok(lock(&self.expenses)
            .iter()
            .filter(|expense| {
                range.is_none_or(|range| {
                    range.from <= expense.expense_date && expense.expense_date <= range.to
                })
            })
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemorySms {
    log: Mutex<Vec<SmsNotification>>,
}

impl InMemorySms {
    fn update(
        &self,
        id: &Uuid,
        apply: impl FnOnce(&mut SmsNotification),
    ) -> Result<SmsNotification, SmsRepositoryError> {
        let mut log = lock(&self.log);
        let entry = log
            .iter_mut()
            .find(|entry| &entry.id == id)
            .ok_or_else(|| SmsRepositoryError::not_found(*id))?;
        apply(entry);
        Ok(entry.clone())
    }
}

#[async_trait]
impl SmsRepository for InMemorySms {
    async fn insert_pending(&self, sms: &OutgoingSms) -> Result<SmsNotification, SmsRepositoryError> {
        let stored = SmsNotification {
            id: Uuid::new_v4(),
            rider_id: sms.rider_id,
            recipient_phone: sms.recipient.clone(),
            message: sms.message.clone(),
            message_type: sms.message_type,
            status: SmsStatus::Pending,
            sent_at: None,
            error_message: None,
            created_at: Utc::now(),
        };
        lock(&self.log).push(stored.clone());
        Ok(stored)
    }

    async fn mark_sent(
        &self,
        id: &Uuid,
        sent_at: DateTime<Utc>,
    ) -> Result<SmsNotification, SmsRepositoryError> {
        self.update(id, |entry| {
            entry.status = SmsStatus::Sent;
            entry.sent_at = Some(sent_at);
        })
    }

    async fn mark_failed(
        &self,
        id: &Uuid,
        error_message: &str,
    ) -> Result<SmsNotification, SmsRepositoryError> {
        self.update(id, |entry| {
            entry.status = SmsStatus::Failed;
            entry.error_message = Some(error_message.to_owned());
        })
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<SmsNotification>, SmsRepositoryError> {
        let take = usize::try_from(limit).unwrap_or(0);
        Ok(lock(&self.log).iter().rev().take(take).cloned().collect())
    }

    async fn has_received(
        &self,
        rider_id: &Uuid,
        message_type: SmsMessageType,
        since: Option<DateTime<Utc>>,
    ) -> Result<bool, SmsRepositoryError> {
        Ok(lock(&self.log).iter().any(|entry| {
            entry.rider_id.as_ref() == Some(rider_id)
                && entry.message_type == message_type
                && since.is_none_or(|since| entry.created_at >= since)
        }))
    }
}

/// State over fresh in-memory stores, plus a handle for seeding staff.
pub fn in_memory_state() -> (HttpState, Arc<InMemoryStaff>) {
    let staff = Arc::new(InMemoryStaff::default());
    let repos = Repositories {
        staff: staff.clone(),
        riders: Arc::new(InMemoryRiders::default()),
        bikes: Arc::new(InMemoryBikes::default()),
        payments: Arc::new(InMemoryPayments),
        expenses: Arc::new(InMemoryExpenses::default()),
        sms: Arc::new(InMemorySms::default()),
    };
    let state = HttpState::from_repositories(
        repos,
        Arc::new(LoggingSmsGateway),
        MessageTemplates::new("MotoFinance"),
        Arc::new(DefaultClock),
    );
    (state, staff)
}

pub fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .build()
}
