//! Collaboration record queries.

use crate::client::{RedisError, RedisPool, RedisResult};
use redis::AsyncCommands;

fn doc_key(record_id: &str) -> String {
    format!("compass:collaboration:{}", record_id)
}

fn student_zset_key(student_id: &str) -> String {
    format!("compass:collaborations:student:{}", student_id)
}

/// Store a collaboration record, scored by its timestamp for ordering.
pub async fn put_record(
    pool: &RedisPool,
    record_id: &str,
    student_id: &str,
    json: &str,
    score: i64,
) -> RedisResult<()> {
    let mut conn = pool.clone();
    let key = doc_key(record_id);
    conn.hset::<_, _, _, ()>(&key, "data", json).await?;
    conn.hset::<_, _, _, ()>(&key, "student_id", student_id).await?;
    conn.zadd::<_, _, _, ()>(&student_zset_key(student_id), record_id, score).await?;
    Ok(())
}

/// Fetch a collaboration record by id.
pub async fn get_record(pool: &RedisPool, record_id: &str) -> RedisResult<String> {
    let mut conn = pool.clone();
    let json: Option<String> = conn.hget(&doc_key(record_id), "data").await?;
    json.ok_or_else(|| RedisError::NotFound(format!("Collaboration not found: {}", record_id)))
}

/// List a student's collaboration records, newest first.
pub async fn list_for_student(pool: &RedisPool, student_id: &str) -> RedisResult<Vec<String>> {
    let mut conn = pool.clone();
    let ids: Vec<String> = conn.zrevrange(&student_zset_key(student_id), 0, -1).await?;
    let mut docs = Vec::with_capacity(ids.len());
    for id in ids {
        let json: Option<String> = conn.hget(&doc_key(&id), "data").await?;
        if let Some(j) = json {
            docs.push(j);
        }
    }
    Ok(docs)
}
