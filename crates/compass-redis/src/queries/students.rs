//! Student document queries.

use crate::client::{RedisError, RedisPool, RedisResult};
use redis::AsyncCommands;

const ALL_KEY: &str = "compass:students:all";
const BY_NUMBER_KEY: &str = "compass:students:by_number";

fn doc_key(student_id: &str) -> String {
    format!("compass:student:{}", student_id)
}

/// Store a student document and index it in the enrollment-ordered set.
pub async fn put_student(
    pool: &RedisPool,
    student_id: &str,
    json: &str,
    score: i64,
) -> RedisResult<()> {
    let mut conn = pool.clone();
    conn.hset::<_, _, _, ()>(&doc_key(student_id), "data", json).await?;
    conn.zadd::<_, _, _, ()>(ALL_KEY, student_id, score).await?;
    Ok(())
}

/// Fetch a student document by id.
pub async fn get_student(pool: &RedisPool, student_id: &str) -> RedisResult<String> {
    let mut conn = pool.clone();
    let json: Option<String> = conn.hget(&doc_key(student_id), "data").await?;
    json.ok_or_else(|| RedisError::NotFound(format!("Student not found: {}", student_id)))
}

/// List all student documents in enrollment order.
pub async fn list_students(pool: &RedisPool) -> RedisResult<Vec<String>> {
    let mut conn = pool.clone();
    let ids: Vec<String> = conn.zrange(ALL_KEY, 0, -1).await?;
    let mut docs = Vec::with_capacity(ids.len());
    for id in ids {
        let json: Option<String> = conn.hget(&doc_key(&id), "data").await?;
        if let Some(j) = json {
            docs.push(j);
        }
    }
    Ok(docs)
}

/// Atomically claim a student number.
///
/// Returns false when the number is already registered to another student.
pub async fn try_claim_student_number(
    pool: &RedisPool,
    student_number: &str,
    student_id: &str,
) -> RedisResult<bool> {
    let mut conn = pool.clone();
    let claimed: bool = conn.hset_nx(BY_NUMBER_KEY, student_number, student_id).await?;
    Ok(claimed)
}

/// Release a student number, but only if this student still holds it.
pub async fn release_student_number(
    pool: &RedisPool,
    student_number: &str,
    student_id: &str,
) -> RedisResult<()> {
    let mut conn = pool.clone();
    let current: Option<String> = conn.hget(BY_NUMBER_KEY, student_number).await?;
    if current.as_deref() == Some(student_id) {
        conn.hdel::<_, _, ()>(BY_NUMBER_KEY, student_number).await?;
    }
    Ok(())
}

// Run against a live Redis: cargo test -p compass-redis -- --ignored
#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::init_pool;

    async fn pool() -> RedisPool {
        let url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        init_pool(&url).await.expect("redis available")
    }

    #[tokio::test]
    #[ignore]
    async fn released_student_number_can_be_reclaimed() {
        let pool = pool().await;
        let number = format!("test-{}", uuid_like());

        assert!(try_claim_student_number(&pool, &number, "s-1").await.unwrap());
        assert!(!try_claim_student_number(&pool, &number, "s-2").await.unwrap());

        // A non-holder cannot release the number.
        release_student_number(&pool, &number, "s-2").await.unwrap();
        assert!(!try_claim_student_number(&pool, &number, "s-2").await.unwrap());

        release_student_number(&pool, &number, "s-1").await.unwrap();
        assert!(try_claim_student_number(&pool, &number, "s-2").await.unwrap());

        release_student_number(&pool, &number, "s-2").await.unwrap();
    }

    fn uuid_like() -> u128 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    }
}
