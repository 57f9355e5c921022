//! Pathway document queries.
//!
//! A pathway is one JSON document under one key, so every mutation is a
//! read-modify-write of a single key. The `active` hash maps student_id to
//! the id of that student's active pathway; claiming an entry goes through
//! HSETNX so the one-active-pathway-per-student invariant holds without a
//! separate existence query.

use crate::client::{RedisError, RedisPool, RedisResult};
use redis::AsyncCommands;

const ACTIVE_KEY: &str = "compass:pathways:active";

fn doc_key(pathway_id: &str) -> String {
    format!("compass:pathway:{}", pathway_id)
}

fn student_set_key(student_id: &str) -> String {
    format!("compass:pathways:student:{}", student_id)
}

/// Store a pathway document and index it under its student.
pub async fn put_pathway(
    pool: &RedisPool,
    pathway_id: &str,
    student_id: &str,
    json: &str,
) -> RedisResult<()> {
    let mut conn = pool.clone();
    let key = doc_key(pathway_id);
    conn.hset::<_, _, _, ()>(&key, "data", json).await?;
    conn.hset::<_, _, _, ()>(&key, "student_id", student_id).await?;
    conn.sadd::<_, _, ()>(&student_set_key(student_id), pathway_id).await?;
    Ok(())
}

/// Fetch a pathway document by id.
pub async fn get_pathway(pool: &RedisPool, pathway_id: &str) -> RedisResult<String> {
    let mut conn = pool.clone();
    let json: Option<String> = conn.hget(&doc_key(pathway_id), "data").await?;
    json.ok_or_else(|| RedisError::NotFound(format!("Pathway not found: {}", pathway_id)))
}

/// Atomically claim the active slot for a student.
///
/// Returns false when another pathway already holds the slot.
pub async fn try_claim_active(
    pool: &RedisPool,
    student_id: &str,
    pathway_id: &str,
) -> RedisResult<bool> {
    let mut conn = pool.clone();
    let claimed: bool = conn.hset_nx(ACTIVE_KEY, student_id, pathway_id).await?;
    Ok(claimed)
}

/// Release the active slot, but only if this pathway still holds it.
pub async fn release_active(
    pool: &RedisPool,
    student_id: &str,
    pathway_id: &str,
) -> RedisResult<()> {
    let mut conn = pool.clone();
    let current: Option<String> = conn.hget(ACTIVE_KEY, student_id).await?;
    if current.as_deref() == Some(pathway_id) {
        conn.hdel::<_, _, ()>(ACTIVE_KEY, student_id).await?;
    }
    Ok(())
}

/// Get the id of a student's active pathway, if any.
pub async fn get_active_pathway_id(
    pool: &RedisPool,
    student_id: &str,
) -> RedisResult<Option<String>> {
    let mut conn = pool.clone();
    let id: Option<String> = conn.hget(ACTIVE_KEY, student_id).await?;
    Ok(id)
}

/// List all pathway ids for a student (active and retired).
pub async fn list_pathway_ids(pool: &RedisPool, student_id: &str) -> RedisResult<Vec<String>> {
    let mut conn = pool.clone();
    let ids: Vec<String> = conn.smembers(&student_set_key(student_id)).await?;
    Ok(ids)
}
