//! PostgreSQL-backed `SmsRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::exists;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{SmsRepository, SmsRepositoryError};
use crate::domain::{OutgoingSms, SmsMessageType, SmsNotification, SmsStatus};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewSmsNotificationRow, SmsNotificationRow};
use super::pool::{DbPool, PoolError};
use super::schema::sms_notifications;

/// Earlier notifications of `message_type` to `rider_id` in any status.
/// Failed sends count, so a sweep never retries them.
fn prior_notifications(
    rider_id: Uuid,
    message_type: SmsMessageType,
    since: Option<DateTime<Utc>>,
) -> sms_notifications::BoxedQuery<'static, Pg> {
    let mut query = sms_notifications::table
        .filter(sms_notifications::rider_id.eq(rider_id))
        .filter(sms_notifications::message_type.eq(message_type.as_str()))
        .into_boxed();
    if let Some(since) = since {
        query = query.filter(sms_notifications::created_at.ge(since));
    }
    query
}

/// Diesel-backed SMS dispatch log.
#[derive(Clone)]
pub struct DieselSmsRepository {
    pool: DbPool,
}

impl DieselSmsRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SmsRepositoryError {
    map_basic_pool_error(error, SmsRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SmsRepositoryError {
    map_basic_diesel_error(
        error,
        SmsRepositoryError::query,
        SmsRepositoryError::connection,
    )
}

fn to_notification(row: SmsNotificationRow) -> Result<SmsNotification, SmsRepositoryError> {
    row.into_notification().map_err(SmsRepositoryError::query)
}

impl DieselSmsRepository {
    async fn update_status(
        &self,
        id: &Uuid,
        status: SmsStatus,
        sent_at: Option<DateTime<Utc>>,
        error_message: Option<&str>,
    ) -> Result<SmsNotification, SmsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(sms_notifications::table.filter(sms_notifications::id.eq(id)))
            .set((
                sms_notifications::status.eq(status.as_str()),
                sms_notifications::sent_at.eq(sent_at),
                sms_notifications::error_message.eq(error_message),
            ))
            .returning(SmsNotificationRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .ok_or_else(|| SmsRepositoryError::not_found(*id))
            .and_then(to_notification)
    }
}

#[async_trait]
impl SmsRepository for DieselSmsRepository {
    async fn insert_pending(&self, sms: &OutgoingSms) -> Result<SmsNotification, SmsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewSmsNotificationRow {
            id: Uuid::new_v4(),
            rider_id: sms.rider_id,
            recipient_phone: sms.recipient.as_str(),
            message: &sms.message,
            message_type: sms.message_type.as_str(),
            status: SmsStatus::Pending.as_str(),
        };

        let inserted = diesel::insert_into(sms_notifications::table)
            .values(&row)
            .returning(SmsNotificationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_notification(inserted)
    }

    async fn mark_sent(
        &self,
        id: &Uuid,
        sent_at: DateTime<Utc>,
    ) -> Result<SmsNotification, SmsRepositoryError> {
        self.update_status(id, SmsStatus::Sent, Some(sent_at), None)
            .await
    }

    async fn mark_failed(
        &self,
        id: &Uuid,
        error_message: &str,
    ) -> Result<SmsNotification, SmsRepositoryError> {
        self.update_status(id, SmsStatus::Failed, None, Some(error_message))
            .await
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<SmsNotification>, SmsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        sms_notifications::table
            .select(SmsNotificationRow::as_select())
            .order(sms_notifications::created_at.desc())
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(to_notification)
            .collect()
    }

    async fn has_received(
        &self,
        rider_id: &Uuid,
        message_type: SmsMessageType,
        since: Option<DateTime<Utc>>,
    ) -> Result<bool, SmsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(prior_notifications(*rider_id, message_type, since)))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
