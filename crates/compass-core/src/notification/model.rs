//! Notification domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pathway::model::{Milestone, MilestonePriority};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    MilestoneDue,
    MilestoneDelayed,
    NewMessage,
    PathwayUpdated,
    MeetingScheduled,
    ActionAssigned,
}

/// Delivery priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Urgent,
    High,
    Normal,
    Low,
}

/// What kind of entity a notification points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedEntityKind {
    Student,
    Milestone,
    Pathway,
    Meeting,
}

/// A reference from a notification to the entity it concerns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedEntity {
    pub kind: RelatedEntityKind,
    pub id: String,
}

/// A notification delivered to one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub priority: NotificationPriority,
    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub related_entity: Option<RelatedEntity>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Fields supplied when creating a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationDraft {
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub priority: NotificationPriority,
    pub related_entity: Option<RelatedEntity>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn new(draft: NotificationDraft) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: draft.user_id,
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            priority: draft.priority,
            read: false,
            read_at: None,
            related_entity: draft.related_entity,
            created_at: Utc::now(),
            expires_at: draft.expires_at,
        }
    }

    /// Mark as read, stamping the time.
    pub fn mark_read(&mut self) {
        self.read = true;
        self.read_at = Some(Utc::now());
    }
}

/// Milestone priority maps onto notification priority: critical milestones
/// page urgently, high stays high, everything else is routine.
pub fn priority_for_milestone(priority: MilestonePriority) -> NotificationPriority {
    match priority {
        MilestonePriority::Critical => NotificationPriority::Urgent,
        MilestonePriority::High => NotificationPriority::High,
        MilestonePriority::Medium | MilestonePriority::Low => NotificationPriority::Normal,
    }
}

/// Build the standard due/delayed notification for a milestone.
pub fn milestone_notification(
    user_id: &str,
    milestone: &Milestone,
    kind: NotificationKind,
) -> NotificationDraft {
    let (title, message) = match kind {
        NotificationKind::MilestoneDelayed => (
            format!("Milestone delayed: {}", milestone.title),
            format!(
                "Milestone \"{}\" has been delayed. Please review and adjust the plan.",
                milestone.title
            ),
        ),
        _ => (
            format!("Milestone due soon: {}", milestone.title),
            format!(
                "Milestone \"{}\" is due on {}. Please follow up.",
                milestone.title,
                milestone.planned_date.format("%Y-%m-%d")
            ),
        ),
    };

    NotificationDraft {
        user_id: user_id.to_string(),
        kind,
        title,
        message,
        priority: priority_for_milestone(milestone.priority),
        related_entity: Some(RelatedEntity {
            kind: RelatedEntityKind::Milestone,
            id: milestone.id.clone(),
        }),
        expires_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathway::model::{
        MilestoneCategory, MilestoneDraft, MilestoneKind,
    };

    fn milestone(priority: MilestonePriority) -> Milestone {
        MilestoneDraft {
            kind: MilestoneKind::Exam,
            category: MilestoneCategory::StandardizedTest,
            title: "IELTS".to_string(),
            description: "Sit the IELTS exam".to_string(),
            planned_date: Utc::now(),
            priority,
            dependencies: vec![],
            assigned_to: vec![],
            notes: None,
        }
        .into_milestone("m-1".to_string())
    }

    #[test]
    fn milestone_priority_maps_to_notification_priority() {
        assert_eq!(
            priority_for_milestone(MilestonePriority::Critical),
            NotificationPriority::Urgent
        );
        assert_eq!(
            priority_for_milestone(MilestonePriority::High),
            NotificationPriority::High
        );
        assert_eq!(
            priority_for_milestone(MilestonePriority::Medium),
            NotificationPriority::Normal
        );
        assert_eq!(
            priority_for_milestone(MilestonePriority::Low),
            NotificationPriority::Normal
        );
    }

    #[test]
    fn delayed_notification_references_the_milestone() {
        let m = milestone(MilestonePriority::Critical);
        let draft = milestone_notification("t-1", &m, NotificationKind::MilestoneDelayed);

        assert_eq!(draft.priority, NotificationPriority::Urgent);
        assert!(draft.title.contains("IELTS"));
        let entity = draft.related_entity.unwrap();
        assert_eq!(entity.kind, RelatedEntityKind::Milestone);
        assert_eq!(entity.id, "m-1");
    }

    #[test]
    fn mark_read_stamps_the_time() {
        let mut n = Notification::new(NotificationDraft {
            user_id: "t-1".to_string(),
            kind: NotificationKind::NewMessage,
            title: "Hello".to_string(),
            message: "A new message arrived".to_string(),
            priority: NotificationPriority::Normal,
            related_entity: None,
            expires_at: None,
        });
        assert!(!n.read);

        n.mark_read();
        assert!(n.read);
        assert!(n.read_at.is_some());
    }
}
