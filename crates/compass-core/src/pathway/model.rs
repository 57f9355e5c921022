//! Pathway domain models.
//!
//! A pathway is the aggregate root: it owns its milestones and its
//! adjustment history, and carries a version counter that moves forward by
//! one on every structural mutation (add milestone, update milestone, add
//! adjustment) and on nothing else. Overall progress is always derived from
//! the milestone list, never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// Milestone lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    Pending,
    InProgress,
    Completed,
    Delayed,
    Cancelled,
}

impl MilestoneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Delayed => "delayed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Milestone priority; drives the aggregation weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestonePriority {
    Critical,
    High,
    Medium,
    Low,
}

impl MilestonePriority {
    /// Aggregation weight: critical 3, high 2, medium/low 1.
    pub fn weight(&self) -> i64 {
        match self {
            Self::Critical => 3,
            Self::High => 2,
            Self::Medium | Self::Low => 1,
        }
    }
}

/// What a milestone tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    Exam,
    Application,
    Activity,
    Achievement,
    Document,
}

/// Reporting category for a milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneCategory {
    Academic,
    StandardizedTest,
    Extracurricular,
    Application,
}

/// Pathway lifecycle status. Pathways are retired, never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathwayStatus {
    Active,
    Completed,
    Suspended,
}

/// Kind of structural change recorded in the adjustment history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    TargetChange,
    MilestoneAdjust,
    TimelineShift,
}

/// Action item priority (no critical level, unlike milestones).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionItemPriority {
    High,
    Medium,
    Low,
}

/// A small assignable task attached to a milestone or collaboration record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: String,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub completed_by: Option<String>,
    pub priority: ActionItemPriority,
}

/// Fields a caller supplies when creating an action item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionItemDraft {
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: String,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: ActionItemPriority,
}

impl ActionItemDraft {
    pub fn into_action_item(self, id: String) -> ActionItem {
        ActionItem {
            id,
            title: self.title,
            description: self.description,
            assigned_to: self.assigned_to,
            due_date: self.due_date,
            completed: false,
            completed_at: None,
            completed_by: None,
            priority: self.priority,
        }
    }
}

/// An uploaded file reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    pub url: String,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
    pub content_type: String,
    pub size: u64,
}

/// A standardized-test requirement for a target university.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRequirement {
    pub kind: String,
    pub min_score: f64,
}

/// Admission requirements for a target university.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UniversityRequirements {
    pub min_gpa: Option<f64>,
    #[serde(default)]
    pub standardized_tests: Vec<TestRequirement>,
    #[serde(default)]
    pub other: Vec<String>,
}

/// An admission goal: university plus intended major and requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct University {
    pub id: String,
    pub name: String,
    pub country: String,
    pub ranking: Option<u32>,
    pub major: String,
    #[serde(default)]
    pub requirements: UniversityRequirements,
}

/// A single trackable task within a pathway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub kind: MilestoneKind,
    pub category: MilestoneCategory,
    pub title: String,
    pub description: String,
    pub planned_date: DateTime<Utc>,
    pub actual_date: Option<DateTime<Utc>>,
    pub status: MilestoneStatus,
    pub priority: MilestonePriority,
    /// Integer in [0, 100].
    pub progress: i64,
    /// Ids of other milestones in the same pathway. Descriptive ordering
    /// metadata only; progress updates are not gated on dependencies.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Responsible teacher ids.
    #[serde(default)]
    pub assigned_to: Vec<String>,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub notes: Option<String>,
}

impl Milestone {
    /// Shallow-merge a set of field updates onto this milestone.
    pub fn apply(&mut self, updates: &MilestoneUpdate) {
        if let Some(title) = &updates.title {
            self.title = title.clone();
        }
        if let Some(description) = &updates.description {
            self.description = description.clone();
        }
        if let Some(planned_date) = updates.planned_date {
            self.planned_date = planned_date;
        }
        if let Some(actual_date) = updates.actual_date {
            self.actual_date = Some(actual_date);
        }
        if let Some(status) = updates.status {
            self.status = status;
        }
        if let Some(priority) = updates.priority {
            self.priority = priority;
        }
        if let Some(progress) = updates.progress {
            self.progress = progress;
        }
        if let Some(dependencies) = &updates.dependencies {
            self.dependencies = dependencies.clone();
        }
        if let Some(assigned_to) = &updates.assigned_to {
            self.assigned_to = assigned_to.clone();
        }
        if let Some(notes) = &updates.notes {
            self.notes = Some(notes.clone());
        }
    }
}

/// A partial update for a milestone; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MilestoneUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub planned_date: Option<DateTime<Utc>>,
    pub actual_date: Option<DateTime<Utc>>,
    pub status: Option<MilestoneStatus>,
    pub priority: Option<MilestonePriority>,
    pub progress: Option<i64>,
    pub dependencies: Option<Vec<String>>,
    pub assigned_to: Option<Vec<String>>,
    pub notes: Option<String>,
}

/// Build the update a progress patch implies: the status is derived from the
/// boundary values (0 back to pending, 100 completes and stamps the actual
/// date, anything else is in progress).
pub fn progress_update(progress: i64) -> MilestoneUpdate {
    let mut updates = MilestoneUpdate {
        progress: Some(progress),
        ..Default::default()
    };
    if progress == 0 {
        updates.status = Some(MilestoneStatus::Pending);
    } else if progress == 100 {
        updates.status = Some(MilestoneStatus::Completed);
        updates.actual_date = Some(Utc::now());
    } else {
        updates.status = Some(MilestoneStatus::InProgress);
    }
    updates
}

/// Fields a caller supplies when creating a milestone. The server assigns
/// the id and starts the milestone at pending/0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneDraft {
    pub kind: MilestoneKind,
    pub category: MilestoneCategory,
    pub title: String,
    pub description: String,
    pub planned_date: DateTime<Utc>,
    pub priority: MilestonePriority,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub assigned_to: Vec<String>,
    pub notes: Option<String>,
}

impl MilestoneDraft {
    pub fn into_milestone(self, id: String) -> Milestone {
        Milestone {
            id,
            kind: self.kind,
            category: self.category,
            title: self.title,
            description: self.description,
            planned_date: self.planned_date,
            actual_date: None,
            status: MilestoneStatus::Pending,
            priority: self.priority,
            progress: 0,
            dependencies: self.dependencies,
            assigned_to: self.assigned_to,
            action_items: Vec::new(),
            attachments: Vec::new(),
            notes: self.notes,
        }
    }
}

/// An immutable audit record of a structural change to a pathway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adjustment {
    pub id: String,
    pub date: DateTime<Utc>,
    pub kind: AdjustmentKind,
    pub description: String,
    pub reason: String,
    pub made_by: String,
    #[serde(default)]
    pub affected_milestones: Vec<String>,
    pub previous_value: Option<Value>,
    pub new_value: Option<Value>,
}

/// An adjustment as submitted by a caller; id and date are assigned on
/// append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentDraft {
    pub kind: AdjustmentKind,
    pub description: String,
    pub reason: String,
    pub made_by: String,
    #[serde(default)]
    pub affected_milestones: Vec<String>,
    pub previous_value: Option<Value>,
    pub new_value: Option<Value>,
}

/// A student's admission plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pathway {
    pub id: String,
    pub student_id: String,
    pub target_university: University,
    pub milestones: Vec<Milestone>,
    pub status: PathwayStatus,
    pub version: i64,
    pub adjustment_history: Vec<Adjustment>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl Pathway {
    /// Create a new active pathway at version 1.
    pub fn new(student_id: String, target_university: University, milestones: Vec<Milestone>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            student_id,
            target_university,
            milestones,
            status: PathwayStatus::Active,
            version: 1,
            adjustment_history: Vec::new(),
            created_at: now,
            last_modified: now,
        }
    }

    /// Record a structural mutation: bump the version and the modification
    /// timestamp.
    fn touch(&mut self) {
        self.version += 1;
        self.last_modified = Utc::now();
    }

    /// Check a caller-submitted version against the current one.
    pub fn check_version(&self, expected: Option<i64>) -> CoreResult<()> {
        if let Some(expected) = expected {
            if expected != self.version {
                return Err(CoreError::VersionConflict {
                    expected,
                    actual: self.version,
                });
            }
        }
        Ok(())
    }

    /// Look up a milestone by id.
    pub fn milestone(&self, milestone_id: &str) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == milestone_id)
    }

    /// Append a milestone. Bumps the version.
    pub fn add_milestone(&mut self, milestone: Milestone) {
        self.milestones.push(milestone);
        self.touch();
    }

    /// Shallow-merge updates onto an existing milestone. Bumps the version;
    /// fails without touching anything when the id is unknown.
    pub fn update_milestone(
        &mut self,
        milestone_id: &str,
        updates: &MilestoneUpdate,
    ) -> CoreResult<&Milestone> {
        let idx = self
            .milestones
            .iter()
            .position(|m| m.id == milestone_id)
            .ok_or_else(|| CoreError::MilestoneNotFound(milestone_id.to_string()))?;
        self.milestones[idx].apply(updates);
        self.touch();
        Ok(&self.milestones[idx])
    }

    /// Progress patch: set a milestone's progress and derive its status.
    pub fn apply_progress(&mut self, milestone_id: &str, progress: i64) -> CoreResult<&Milestone> {
        let updates = progress_update(progress);
        self.update_milestone(milestone_id, &updates)
    }

    /// Append to the adjustment history. The log is write-once: there is no
    /// removal or edit operation. Bumps the version and returns the new
    /// adjustment's id.
    pub fn add_adjustment(&mut self, draft: AdjustmentDraft) -> String {
        let id = Uuid::new_v4().to_string();
        self.adjustment_history.push(Adjustment {
            id: id.clone(),
            date: Utc::now(),
            kind: draft.kind,
            description: draft.description,
            reason: draft.reason,
            made_by: draft.made_by,
            affected_milestones: draft.affected_milestones,
            previous_value: draft.previous_value,
            new_value: draft.new_value,
        });
        self.touch();
        id
    }

    /// Attach an action item to a milestone. Not a structural mutation: the
    /// version stays, only the modification timestamp moves.
    pub fn add_action_item(
        &mut self,
        milestone_id: &str,
        item: ActionItem,
    ) -> CoreResult<ActionItem> {
        let milestone = self
            .milestones
            .iter_mut()
            .find(|m| m.id == milestone_id)
            .ok_or_else(|| CoreError::MilestoneNotFound(milestone_id.to_string()))?;
        milestone.action_items.push(item.clone());
        self.last_modified = Utc::now();
        Ok(item)
    }

    /// Priority-weighted average of milestone progress, recomputed on every
    /// call.
    pub fn overall_progress(&self) -> i64 {
        overall_progress(&self.milestones)
    }
}

/// Weighted completion percentage over a milestone set.
///
/// A pure, order-independent fold: `round(Σ progress·w / Σ w)` with the
/// weights from [`MilestonePriority::weight`]. An empty set is 0.
pub fn overall_progress(milestones: &[Milestone]) -> i64 {
    if milestones.is_empty() {
        return 0;
    }
    let total_weight: i64 = milestones.iter().map(|m| m.priority.weight()).sum();
    let weighted: i64 = milestones
        .iter()
        .map(|m| m.progress * m.priority.weight())
        .sum();
    (weighted as f64 / total_weight as f64).round() as i64
}

/// A pathway as served to clients: the document plus the derived overall
/// progress.
#[derive(Debug, Clone, Serialize)]
pub struct PathwayView {
    #[serde(flatten)]
    pub pathway: Pathway,
    pub overall_progress: i64,
}

impl From<Pathway> for PathwayView {
    fn from(pathway: Pathway) -> Self {
        let overall_progress = pathway.overall_progress();
        Self {
            pathway,
            overall_progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milestone(priority: MilestonePriority, progress: i64) -> Milestone {
        MilestoneDraft {
            kind: MilestoneKind::Exam,
            category: MilestoneCategory::StandardizedTest,
            title: "TOEFL".to_string(),
            description: "Sit the TOEFL exam".to_string(),
            planned_date: Utc::now(),
            priority,
            dependencies: vec![],
            assigned_to: vec![],
            notes: None,
        }
        .into_milestone(Uuid::new_v4().to_string())
        .tap(|m| m.progress = progress)
    }

    // Small helper so the builder above stays readable.
    trait Tap: Sized {
        fn tap(self, f: impl FnOnce(&mut Self)) -> Self;
    }
    impl<T> Tap for T {
        fn tap(mut self, f: impl FnOnce(&mut Self)) -> Self {
            f(&mut self);
            self
        }
    }

    fn university() -> University {
        University {
            id: "mit".to_string(),
            name: "MIT".to_string(),
            country: "USA".to_string(),
            ranking: Some(1),
            major: "Computer Science".to_string(),
            requirements: UniversityRequirements::default(),
        }
    }

    fn pathway_with(milestones: Vec<Milestone>) -> Pathway {
        Pathway::new("student-1".to_string(), university(), milestones)
    }

    #[test]
    fn empty_milestone_list_is_zero() {
        assert_eq!(overall_progress(&[]), 0);
    }

    #[test]
    fn progress_is_bounded() {
        let ms = vec![
            milestone(MilestonePriority::Critical, 100),
            milestone(MilestonePriority::High, 100),
            milestone(MilestonePriority::Low, 100),
        ];
        assert_eq!(overall_progress(&ms), 100);

        let ms = vec![
            milestone(MilestonePriority::Critical, 0),
            milestone(MilestonePriority::Medium, 0),
        ];
        assert_eq!(overall_progress(&ms), 0);
    }

    #[test]
    fn single_critical_completed_milestone_is_one_hundred() {
        let ms = vec![milestone(MilestonePriority::Critical, 100)];
        assert_eq!(overall_progress(&ms), 100);
    }

    #[test]
    fn weighted_average_rounds() {
        // (60*3 + 0*1) / (3+1) = 45
        let ms = vec![
            milestone(MilestonePriority::Critical, 60),
            milestone(MilestonePriority::Low, 0),
        ];
        assert_eq!(overall_progress(&ms), 45);
    }

    #[test]
    fn progress_is_order_independent() {
        let a = milestone(MilestonePriority::Critical, 30);
        let b = milestone(MilestonePriority::High, 70);
        let c = milestone(MilestonePriority::Low, 50);

        let forward = vec![a.clone(), b.clone(), c.clone()];
        let reversed = vec![c, b, a];
        assert_eq!(overall_progress(&forward), overall_progress(&reversed));
    }

    #[test]
    fn medium_and_low_share_a_weight() {
        assert_eq!(MilestonePriority::Medium.weight(), 1);
        assert_eq!(MilestonePriority::Low.weight(), 1);
        assert_eq!(MilestonePriority::High.weight(), 2);
        assert_eq!(MilestonePriority::Critical.weight(), 3);
    }

    #[test]
    fn new_pathway_starts_at_version_one() {
        let p = pathway_with(vec![milestone(MilestonePriority::High, 0)]);
        assert_eq!(p.version, 1);
        assert_eq!(p.status, PathwayStatus::Active);
        assert!(p.adjustment_history.is_empty());
    }

    #[test]
    fn add_milestone_bumps_version_once() {
        let mut p = pathway_with(vec![]);
        p.add_milestone(milestone(MilestonePriority::High, 0));
        assert_eq!(p.version, 2);
        assert_eq!(p.milestones.len(), 1);
        assert_eq!(p.overall_progress(), 0);
    }

    #[test]
    fn update_milestone_merges_and_bumps_version() {
        let mut p = pathway_with(vec![milestone(MilestonePriority::High, 0)]);
        let id = p.milestones[0].id.clone();

        let updates = MilestoneUpdate {
            progress: Some(100),
            status: Some(MilestoneStatus::Completed),
            ..Default::default()
        };
        p.update_milestone(&id, &updates).unwrap();

        assert_eq!(p.version, 2);
        assert_eq!(p.milestones[0].progress, 100);
        assert_eq!(p.milestones[0].status, MilestoneStatus::Completed);
        // Untouched fields survive the merge.
        assert_eq!(p.milestones[0].title, "TOEFL");
        assert_eq!(p.overall_progress(), 100);
    }

    #[test]
    fn update_unknown_milestone_leaves_version_unchanged() {
        let mut p = pathway_with(vec![milestone(MilestonePriority::High, 0)]);
        let err = p
            .update_milestone("no-such-id", &MilestoneUpdate::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::MilestoneNotFound(_)));
        assert_eq!(p.version, 1);
    }

    #[test]
    fn progress_patch_derives_status_at_boundaries() {
        let mut p = pathway_with(vec![milestone(MilestonePriority::High, 0)]);
        let id = p.milestones[0].id.clone();

        p.apply_progress(&id, 40).unwrap();
        assert_eq!(p.milestones[0].status, MilestoneStatus::InProgress);
        assert!(p.milestones[0].actual_date.is_none());

        p.apply_progress(&id, 100).unwrap();
        assert_eq!(p.milestones[0].status, MilestoneStatus::Completed);
        assert!(p.milestones[0].actual_date.is_some());

        p.apply_progress(&id, 0).unwrap();
        assert_eq!(p.milestones[0].status, MilestoneStatus::Pending);

        // Three patches, three bumps.
        assert_eq!(p.version, 4);
    }

    #[test]
    fn adjustments_are_appended_with_id_and_date() {
        let mut p = pathway_with(vec![milestone(MilestonePriority::High, 0)]);
        let draft = AdjustmentDraft {
            kind: AdjustmentKind::TimelineShift,
            description: "Moved the SAT sitting".to_string(),
            reason: "Date clash with finals".to_string(),
            made_by: "teacher-1".to_string(),
            affected_milestones: vec![],
            previous_value: None,
            new_value: None,
        };

        let id = p.add_adjustment(draft.clone());
        assert_eq!(p.version, 2);
        assert_eq!(p.adjustment_history.len(), 1);
        assert_eq!(p.adjustment_history[0].id, id);

        let before = p.adjustment_history.len();
        p.add_adjustment(draft);
        assert_eq!(p.adjustment_history.len(), before + 1);
        assert_eq!(p.version, 3);
    }

    #[test]
    fn action_items_do_not_bump_version() {
        let mut p = pathway_with(vec![milestone(MilestonePriority::High, 0)]);
        let id = p.milestones[0].id.clone();

        let item = ActionItemDraft {
            title: "Book test center".to_string(),
            description: None,
            assigned_to: "teacher-2".to_string(),
            due_date: None,
            priority: ActionItemPriority::Medium,
        }
        .into_action_item(Uuid::new_v4().to_string());

        p.add_action_item(&id, item).unwrap();
        assert_eq!(p.version, 1);
        assert_eq!(p.milestones[0].action_items.len(), 1);

        let err = p
            .add_action_item(
                "no-such-id",
                ActionItemDraft {
                    title: "x".to_string(),
                    description: None,
                    assigned_to: "t".to_string(),
                    due_date: None,
                    priority: ActionItemPriority::Low,
                }
                .into_action_item(Uuid::new_v4().to_string()),
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::MilestoneNotFound(_)));
    }

    #[test]
    fn version_check_rejects_stale_submissions() {
        let p = pathway_with(vec![milestone(MilestonePriority::High, 0)]);
        assert!(p.check_version(None).is_ok());
        assert!(p.check_version(Some(1)).is_ok());

        let err = p.check_version(Some(7)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::VersionConflict {
                expected: 7,
                actual: 1
            }
        ));
    }

    #[test]
    fn end_to_end_progress_scenario() {
        // Start with an empty milestone list.
        let mut p = pathway_with(vec![]);
        assert_eq!(p.overall_progress(), 0);

        let m = MilestoneDraft {
            kind: MilestoneKind::Application,
            category: MilestoneCategory::Application,
            title: "Submit common app".to_string(),
            description: "Complete and submit the application".to_string(),
            planned_date: Utc::now(),
            priority: MilestonePriority::High,
            dependencies: vec![],
            assigned_to: vec![],
            notes: None,
        }
        .into_milestone("m-1".to_string());

        p.add_milestone(m);
        assert_eq!(p.version, 2);
        assert_eq!(p.overall_progress(), 0);

        p.apply_progress("m-1", 100).unwrap();
        assert_eq!(p.version, 3);
        assert_eq!(p.overall_progress(), 100);
    }

    #[test]
    fn pathway_view_carries_derived_progress() {
        let p = pathway_with(vec![
            milestone(MilestonePriority::Critical, 60),
            milestone(MilestonePriority::Low, 0),
        ]);
        let view = PathwayView::from(p);
        assert_eq!(view.overall_progress, 45);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["overall_progress"], 45);
        assert_eq!(json["version"], 1);
    }
}
