//! Broadcast channel for real-time WebSocket updates.
//!
//! Uses a tokio broadcast channel for in-process fan-out; every mutating
//! route publishes a typed message here and connected clients receive it
//! as JSON.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// WebSocket message types for real-time updates.
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(tag = "type", content = "data")]
pub enum WebSocketMessage {
    /// A pathway was created for a student.
    PathwayCreated {
        student_id: String,
        pathway_id: String,
    },
    /// A milestone's fields were updated.
    MilestoneUpdated {
        pathway_id: String,
        milestone_id: String,
        status: String,
    },
    /// A milestone's progress value changed.
    MilestoneProgress {
        pathway_id: String,
        milestone_id: String,
        progress: i64,
        status: String,
    },
    /// An action item was assigned to a teacher.
    ActionItemAssigned {
        milestone_id: String,
        assigned_to: String,
        title: String,
    },
    /// A teacher was assigned to a student.
    StudentAssigned {
        student_id: String,
        teacher_id: String,
    },
    /// A student's primary target university changed.
    TargetUpdated {
        student_id: String,
        university: String,
    },
    /// A notification was created for a user.
    NotificationCreated {
        user_id: String,
        notification_id: String,
    },
}

/// Type alias for the broadcast sender.
pub type BroadcastSender = broadcast::Sender<WebSocketMessage>;

/// Type alias for the broadcast receiver.
pub type BroadcastReceiver = broadcast::Receiver<WebSocketMessage>;

/// Create a new broadcast channel with default capacity.
pub fn create_broadcast_channel() -> BroadcastSender {
    let (tx, _rx) = broadcast::channel(100);
    tx
}
