//! Pathway management.
//!
//! Service functions follow a load → mutate → persist shape against a single
//! pathway document. Mutations accept an optional `expected_version`: when a
//! caller submits the version it read, a concurrent change is rejected with
//! a version conflict instead of silently losing the earlier write.

pub mod model;

pub use model::{
    ActionItem, ActionItemDraft, ActionItemPriority, Adjustment, AdjustmentDraft, AdjustmentKind,
    Attachment, Milestone, MilestoneCategory, MilestoneDraft, MilestoneKind, MilestonePriority,
    MilestoneStatus, MilestoneUpdate, Pathway, PathwayStatus, PathwayView, University,
    overall_progress,
};

use crate::error::{CoreError, CoreResult, lookup_error};
use compass_redis::RedisPool;
use compass_redis::queries::pathways as queries;
use uuid::Uuid;

async fn load(pool: &RedisPool, pathway_id: &str) -> CoreResult<Pathway> {
    let json = queries::get_pathway(pool, pathway_id)
        .await
        .map_err(|e| lookup_error(e, CoreError::PathwayNotFound(pathway_id.to_string())))?;
    Ok(serde_json::from_str(&json)?)
}

async fn store(pool: &RedisPool, pathway: &Pathway) -> CoreResult<()> {
    let json = serde_json::to_string(pathway)?;
    queries::put_pathway(pool, &pathway.id, &pathway.student_id, &json).await?;
    Ok(())
}

/// Create a pathway for a student.
///
/// The student must exist, the pathway needs at least one milestone, and a
/// student can hold only one active pathway: the active slot is claimed
/// atomically before anything is written.
pub async fn create_pathway(
    pool: &RedisPool,
    student_id: &str,
    target_university: University,
    milestones: Vec<MilestoneDraft>,
) -> CoreResult<Pathway> {
    if milestones.is_empty() {
        return Err(CoreError::validation(
            "a pathway needs at least one milestone",
        ));
    }
    crate::student::get_student(pool, student_id).await?;

    let milestones = milestones
        .into_iter()
        .map(|draft| draft.into_milestone(Uuid::new_v4().to_string()))
        .collect();
    let pathway = Pathway::new(student_id.to_string(), target_university, milestones);

    let claimed = queries::try_claim_active(pool, student_id, &pathway.id).await?;
    if !claimed {
        return Err(CoreError::ActivePathwayExists(student_id.to_string()));
    }

    if let Err(err) = store(pool, &pathway).await {
        // Free the active slot rather than leave it held by a document that
        // was never written.
        let _ = queries::release_active(pool, student_id, &pathway.id).await;
        return Err(err);
    }
    tracing::info!(student_id, pathway_id = %pathway.id, "pathway created");
    Ok(pathway)
}

/// Get a pathway by id.
pub async fn get_pathway(pool: &RedisPool, pathway_id: &str) -> CoreResult<Pathway> {
    load(pool, pathway_id).await
}

/// Get a student's active pathway, if one exists.
pub async fn get_active_pathway(
    pool: &RedisPool,
    student_id: &str,
) -> CoreResult<Option<Pathway>> {
    match queries::get_active_pathway_id(pool, student_id).await? {
        Some(id) => Ok(Some(load(pool, &id).await?)),
        None => Ok(None),
    }
}

/// List all pathways for a student, active and retired.
pub async fn list_pathways(pool: &RedisPool, student_id: &str) -> CoreResult<Vec<Pathway>> {
    let ids = queries::list_pathway_ids(pool, student_id).await?;
    let mut pathways = Vec::with_capacity(ids.len());
    for id in ids {
        pathways.push(load(pool, &id).await?);
    }
    Ok(pathways)
}

/// Append a milestone to a pathway. The id is assigned here; the milestone
/// starts at pending/0.
pub async fn add_milestone(
    pool: &RedisPool,
    pathway_id: &str,
    draft: MilestoneDraft,
    expected_version: Option<i64>,
) -> CoreResult<Pathway> {
    let mut pathway = load(pool, pathway_id).await?;
    pathway.check_version(expected_version)?;

    let milestone = draft.into_milestone(Uuid::new_v4().to_string());
    let milestone_id = milestone.id.clone();
    pathway.add_milestone(milestone);

    store(pool, &pathway).await?;
    tracing::info!(pathway_id, milestone_id, "milestone added");
    Ok(pathway)
}

/// Shallow-merge field updates onto a milestone.
pub async fn update_milestone(
    pool: &RedisPool,
    pathway_id: &str,
    milestone_id: &str,
    updates: &MilestoneUpdate,
    expected_version: Option<i64>,
) -> CoreResult<Pathway> {
    if let Some(progress) = updates.progress {
        validate_progress(progress)?;
    }
    let mut pathway = load(pool, pathway_id).await?;
    pathway.check_version(expected_version)?;
    pathway.update_milestone(milestone_id, updates)?;

    store(pool, &pathway).await?;
    tracing::info!(pathway_id, milestone_id, "milestone updated");
    Ok(pathway)
}

/// Progress-only convenience patch; derives the milestone status from the
/// boundary values.
pub async fn update_milestone_progress(
    pool: &RedisPool,
    pathway_id: &str,
    milestone_id: &str,
    progress: i64,
    expected_version: Option<i64>,
) -> CoreResult<Pathway> {
    validate_progress(progress)?;
    let mut pathway = load(pool, pathway_id).await?;
    pathway.check_version(expected_version)?;
    pathway.apply_progress(milestone_id, progress)?;

    store(pool, &pathway).await?;
    tracing::info!(pathway_id, milestone_id, progress, "milestone progress updated");
    Ok(pathway)
}

/// Append an adjustment to the write-once history.
pub async fn add_adjustment(
    pool: &RedisPool,
    pathway_id: &str,
    draft: AdjustmentDraft,
    expected_version: Option<i64>,
) -> CoreResult<Pathway> {
    let mut pathway = load(pool, pathway_id).await?;
    pathway.check_version(expected_version)?;
    let adjustment_id = pathway.add_adjustment(draft);

    store(pool, &pathway).await?;
    tracing::info!(pathway_id, adjustment_id, "adjustment recorded");
    Ok(pathway)
}

/// Attach an action item to a milestone. Does not bump the pathway version.
pub async fn add_action_item(
    pool: &RedisPool,
    pathway_id: &str,
    milestone_id: &str,
    draft: ActionItemDraft,
    expected_version: Option<i64>,
) -> CoreResult<(Pathway, ActionItem)> {
    let mut pathway = load(pool, pathway_id).await?;
    pathway.check_version(expected_version)?;

    let item = draft.into_action_item(Uuid::new_v4().to_string());
    let item = pathway.add_action_item(milestone_id, item)?;

    store(pool, &pathway).await?;
    tracing::info!(pathway_id, milestone_id, item_id = %item.id, "action item added");
    Ok((pathway, item))
}

/// Transition a pathway's lifecycle status. Leaving `active` releases the
/// student's active slot; moving back to `active` has to re-claim it.
pub async fn set_status(
    pool: &RedisPool,
    pathway_id: &str,
    status: PathwayStatus,
    expected_version: Option<i64>,
) -> CoreResult<Pathway> {
    let mut pathway = load(pool, pathway_id).await?;
    pathway.check_version(expected_version)?;

    let was_active = pathway.status == PathwayStatus::Active;
    let becomes_active = status == PathwayStatus::Active;

    if becomes_active && !was_active {
        let claimed = queries::try_claim_active(pool, &pathway.student_id, &pathway.id).await?;
        if !claimed {
            return Err(CoreError::ActivePathwayExists(pathway.student_id.clone()));
        }
    }

    pathway.status = status;
    pathway.last_modified = chrono::Utc::now();

    if let Err(err) = store(pool, &pathway).await {
        if becomes_active && !was_active {
            let _ = queries::release_active(pool, &pathway.student_id, &pathway.id).await;
        }
        return Err(err);
    }

    if was_active && !becomes_active {
        queries::release_active(pool, &pathway.student_id, &pathway.id).await?;
    }

    tracing::info!(pathway_id, status = ?status, "pathway status changed");
    Ok(pathway)
}

fn validate_progress(progress: i64) -> CoreResult<()> {
    if !(0..=100).contains(&progress) {
        return Err(CoreError::validation("progress must be between 0 and 100"));
    }
    Ok(())
}
