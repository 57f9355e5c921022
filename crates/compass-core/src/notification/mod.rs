//! Notification management.

pub mod model;

pub use model::{
    Notification, NotificationDraft, NotificationKind, NotificationPriority, RelatedEntity,
    RelatedEntityKind, milestone_notification, priority_for_milestone,
};

use crate::error::{CoreError, CoreResult, lookup_error};
use compass_redis::RedisPool;
use compass_redis::queries::notifications as queries;

async fn store(pool: &RedisPool, notification: &Notification) -> CoreResult<()> {
    let json = serde_json::to_string(notification)?;
    queries::put_notification(
        pool,
        &notification.id,
        &notification.user_id,
        &json,
        notification.created_at.timestamp(),
        notification.read,
    )
    .await?;
    Ok(())
}

/// Create and persist a notification.
pub async fn create_notification(
    pool: &RedisPool,
    draft: NotificationDraft,
) -> CoreResult<Notification> {
    let notification = Notification::new(draft);
    store(pool, &notification).await?;
    tracing::debug!(
        notification_id = %notification.id,
        user_id = %notification.user_id,
        "notification created"
    );
    Ok(notification)
}

/// List a user's notifications, newest first.
pub async fn list_for_user(pool: &RedisPool, user_id: &str) -> CoreResult<Vec<Notification>> {
    let docs = queries::list_for_user(pool, user_id).await?;
    let mut notifications = Vec::with_capacity(docs.len());
    for doc in docs {
        notifications.push(serde_json::from_str(&doc)?);
    }
    Ok(notifications)
}

/// Count a user's unread notifications.
pub async fn unread_count(pool: &RedisPool, user_id: &str) -> CoreResult<i64> {
    Ok(queries::unread_count(pool, user_id).await?)
}

/// Mark a notification as read.
pub async fn mark_read(pool: &RedisPool, notification_id: &str) -> CoreResult<Notification> {
    let json = queries::get_notification(pool, notification_id)
        .await
        .map_err(|e| {
            lookup_error(e, CoreError::NotificationNotFound(notification_id.to_string()))
        })?;
    let mut notification: Notification = serde_json::from_str(&json)?;
    notification.mark_read();
    store(pool, &notification).await?;
    Ok(notification)
}
