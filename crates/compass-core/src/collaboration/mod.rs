//! Collaboration record management.

pub mod model;

pub use model::{CollaborationDraft, CollaborationKind, CollaborationRecord, Decision};

use crate::error::{CoreError, CoreResult, lookup_error};
use crate::pathway::model::{ActionItem, ActionItemDraft};
use compass_redis::RedisPool;
use compass_redis::queries::collaborations as queries;

async fn load(pool: &RedisPool, record_id: &str) -> CoreResult<CollaborationRecord> {
    let json = queries::get_record(pool, record_id)
        .await
        .map_err(|e| lookup_error(e, CoreError::CollaborationNotFound(record_id.to_string())))?;
    Ok(serde_json::from_str(&json)?)
}

async fn store(pool: &RedisPool, record: &CollaborationRecord) -> CoreResult<()> {
    let json = serde_json::to_string(record)?;
    queries::put_record(
        pool,
        &record.id,
        &record.student_id,
        &json,
        record.timestamp.timestamp(),
    )
    .await?;
    Ok(())
}

/// Create a collaboration record. The student must exist.
pub async fn create_record(
    pool: &RedisPool,
    draft: CollaborationDraft,
) -> CoreResult<CollaborationRecord> {
    crate::student::get_student(pool, &draft.student_id).await?;
    let record = CollaborationRecord::new(draft);
    store(pool, &record).await?;
    tracing::info!(record_id = %record.id, student_id = %record.student_id, "collaboration recorded");
    Ok(record)
}

/// Get a collaboration record by id.
pub async fn get_record(pool: &RedisPool, record_id: &str) -> CoreResult<CollaborationRecord> {
    load(pool, record_id).await
}

/// List a student's collaboration records, newest first.
pub async fn list_for_student(
    pool: &RedisPool,
    student_id: &str,
) -> CoreResult<Vec<CollaborationRecord>> {
    let docs = queries::list_for_student(pool, student_id).await?;
    let mut records = Vec::with_capacity(docs.len());
    for doc in docs {
        records.push(serde_json::from_str(&doc)?);
    }
    Ok(records)
}

/// Record a decision on an existing collaboration record.
pub async fn add_decision(
    pool: &RedisPool,
    record_id: &str,
    content: String,
    made_by: Vec<String>,
) -> CoreResult<CollaborationRecord> {
    let mut record = load(pool, record_id).await?;
    record.add_decision(content, made_by);
    store(pool, &record).await?;
    Ok(record)
}

/// Attach a follow-up action item to a collaboration record.
pub async fn add_action_item(
    pool: &RedisPool,
    record_id: &str,
    draft: ActionItemDraft,
) -> CoreResult<(CollaborationRecord, ActionItem)> {
    let mut record = load(pool, record_id).await?;
    let item = record.add_action_item(draft);
    store(pool, &record).await?;
    tracing::info!(record_id, item_id = %item.id, assigned_to = %item.assigned_to, "action item added");
    Ok((record, item))
}

/// Mark an action item on a collaboration record complete.
pub async fn complete_action_item(
    pool: &RedisPool,
    record_id: &str,
    action_item_id: &str,
    completed_by: &str,
) -> CoreResult<CollaborationRecord> {
    let mut record = load(pool, record_id).await?;
    record.complete_action_item(action_item_id, completed_by)?;
    store(pool, &record).await?;
    Ok(record)
}
