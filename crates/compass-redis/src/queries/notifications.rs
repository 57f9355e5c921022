//! Notification queries.
//!
//! The unread set per user backs the badge count; writing a notification
//! with `read = true` drops it from the set.

use crate::client::{RedisError, RedisPool, RedisResult};
use redis::AsyncCommands;

fn doc_key(notification_id: &str) -> String {
    format!("compass:notification:{}", notification_id)
}

fn user_zset_key(user_id: &str) -> String {
    format!("compass:notifications:user:{}", user_id)
}

fn unread_set_key(user_id: &str) -> String {
    format!("compass:notifications:unread:{}", user_id)
}

/// Store a notification document and maintain the per-user indexes.
pub async fn put_notification(
    pool: &RedisPool,
    notification_id: &str,
    user_id: &str,
    json: &str,
    score: i64,
    read: bool,
) -> RedisResult<()> {
    let mut conn = pool.clone();
    let key = doc_key(notification_id);
    conn.hset::<_, _, _, ()>(&key, "data", json).await?;
    conn.hset::<_, _, _, ()>(&key, "user_id", user_id).await?;
    conn.zadd::<_, _, _, ()>(&user_zset_key(user_id), notification_id, score).await?;
    if read {
        conn.srem::<_, _, ()>(&unread_set_key(user_id), notification_id).await?;
    } else {
        conn.sadd::<_, _, ()>(&unread_set_key(user_id), notification_id).await?;
    }
    Ok(())
}

/// Fetch a notification document by id.
pub async fn get_notification(pool: &RedisPool, notification_id: &str) -> RedisResult<String> {
    let mut conn = pool.clone();
    let json: Option<String> = conn.hget(&doc_key(notification_id), "data").await?;
    json.ok_or_else(|| {
        RedisError::NotFound(format!("Notification not found: {}", notification_id))
    })
}

/// List a user's notifications, newest first.
pub async fn list_for_user(pool: &RedisPool, user_id: &str) -> RedisResult<Vec<String>> {
    let mut conn = pool.clone();
    let ids: Vec<String> = conn.zrevrange(&user_zset_key(user_id), 0, -1).await?;
    let mut docs = Vec::with_capacity(ids.len());
    for id in ids {
        let json: Option<String> = conn.hget(&doc_key(&id), "data").await?;
        if let Some(j) = json {
            docs.push(j);
        }
    }
    Ok(docs)
}

/// Count a user's unread notifications.
pub async fn unread_count(pool: &RedisPool, user_id: &str) -> RedisResult<i64> {
    let mut conn = pool.clone();
    let count: i64 = conn.scard(&unread_set_key(user_id)).await?;
    Ok(count)
}
