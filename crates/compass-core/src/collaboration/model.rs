//! Collaboration record domain models.
//!
//! A collaboration record captures a meeting or discussion about a student:
//! who took part, what was decided, and which follow-up tasks came out of
//! it. Action items and attachments share their shape with the pathway
//! module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::pathway::model::{ActionItem, ActionItemDraft, Attachment};

/// What kind of collaboration took place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaborationKind {
    Meeting,
    Discussion,
    Decision,
    Update,
    Review,
}

/// A decision reached during a collaboration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub id: String,
    pub content: String,
    pub made_by: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub implemented: bool,
}

/// A record of one collaboration about a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaborationRecord {
    pub id: String,
    pub student_id: String,
    pub participants: Vec<String>,
    pub kind: CollaborationKind,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub decisions: Vec<Decision>,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
    pub timestamp: DateTime<Utc>,
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Fields supplied when creating a collaboration record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaborationDraft {
    pub student_id: String,
    pub participants: Vec<String>,
    pub kind: CollaborationKind,
    pub title: String,
    pub content: String,
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CollaborationRecord {
    pub fn new(draft: CollaborationDraft) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_id: draft.student_id,
            participants: draft.participants,
            kind: draft.kind,
            title: draft.title,
            content: draft.content,
            decisions: Vec::new(),
            action_items: Vec::new(),
            timestamp: Utc::now(),
            duration_minutes: draft.duration_minutes,
            attachments: Vec::new(),
            tags: draft.tags,
        }
    }

    /// Record a decision; id and timestamp are assigned here.
    pub fn add_decision(&mut self, content: String, made_by: Vec<String>) -> String {
        let id = Uuid::new_v4().to_string();
        self.decisions.push(Decision {
            id: id.clone(),
            content,
            made_by,
            timestamp: Utc::now(),
            implemented: false,
        });
        id
    }

    /// Attach a follow-up action item.
    pub fn add_action_item(&mut self, draft: ActionItemDraft) -> ActionItem {
        let item = draft.into_action_item(Uuid::new_v4().to_string());
        self.action_items.push(item.clone());
        item
    }

    /// Mark an action item complete, recording who closed it and when.
    pub fn complete_action_item(
        &mut self,
        action_item_id: &str,
        completed_by: &str,
    ) -> CoreResult<&ActionItem> {
        let item = self
            .action_items
            .iter_mut()
            .find(|i| i.id == action_item_id)
            .ok_or_else(|| CoreError::ActionItemNotFound(action_item_id.to_string()))?;
        item.completed = true;
        item.completed_at = Some(Utc::now());
        item.completed_by = Some(completed_by.to_string());
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathway::model::ActionItemPriority;

    fn record() -> CollaborationRecord {
        CollaborationRecord::new(CollaborationDraft {
            student_id: "student-1".to_string(),
            participants: vec!["t-1".to_string(), "t-2".to_string()],
            kind: CollaborationKind::Meeting,
            title: "Quarterly review".to_string(),
            content: "Reviewed application timeline".to_string(),
            duration_minutes: Some(30),
            tags: vec![],
        })
    }

    #[test]
    fn decisions_get_ids_and_start_unimplemented() {
        let mut r = record();
        let id = r.add_decision(
            "Push the SAT to October".to_string(),
            vec!["t-1".to_string()],
        );
        assert_eq!(r.decisions.len(), 1);
        assert_eq!(r.decisions[0].id, id);
        assert!(!r.decisions[0].implemented);
    }

    #[test]
    fn completing_an_action_item_records_who_and_when() {
        let mut r = record();
        let item = r.add_action_item(ActionItemDraft {
            title: "Share mock exam results".to_string(),
            description: None,
            assigned_to: "t-2".to_string(),
            due_date: None,
            priority: ActionItemPriority::High,
        });
        assert!(!item.completed);

        let completed = r.complete_action_item(&item.id, "t-2").unwrap();
        assert!(completed.completed);
        assert_eq!(completed.completed_by.as_deref(), Some("t-2"));
        assert!(completed.completed_at.is_some());
    }

    #[test]
    fn completing_unknown_action_item_fails() {
        let mut r = record();
        let err = r.complete_action_item("missing", "t-1").unwrap_err();
        assert!(matches!(err, CoreError::ActionItemNotFound(_)));
    }
}
