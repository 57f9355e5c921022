//! Centralized error types for Compass.

use thiserror::Error;

/// Main error type for Compass operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Student not found: {0}")]
    StudentNotFound(String),

    #[error("Pathway not found: {0}")]
    PathwayNotFound(String),

    #[error("Milestone not found: {0}")]
    MilestoneNotFound(String),

    #[error("Action item not found: {0}")]
    ActionItemNotFound(String),

    #[error("Collaboration record not found: {0}")]
    CollaborationNotFound(String),

    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    #[error("Student {0} already has an active pathway")]
    ActivePathwayExists(String),

    #[error("Student number already registered: {0}")]
    StudentNumberTaken(String),

    #[error("Version conflict: submitted against version {expected}, pathway is at {actual}")]
    VersionConflict { expected: i64, actual: i64 },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    Database(#[from] compass_redis::RedisError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for Compass operations.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Whether this error means a referenced entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::StudentNotFound(_)
                | Self::PathwayNotFound(_)
                | Self::MilestoneNotFound(_)
                | Self::ActionItemNotFound(_)
                | Self::CollaborationNotFound(_)
                | Self::NotificationNotFound(_)
                | Self::Database(compass_redis::RedisError::NotFound(_))
        )
    }

    /// Whether this error is a conflict with existing state.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::ActivePathwayExists(_)
                | Self::StudentNumberTaken(_)
                | Self::VersionConflict { .. }
        )
    }
}

/// Map a storage error from a point lookup: an absent key becomes the given
/// domain not-found error, everything else (connection failures, protocol
/// errors) stays a database error.
pub(crate) fn lookup_error(err: compass_redis::RedisError, not_found: CoreError) -> CoreError {
    match err {
        compass_redis::RedisError::NotFound(_) => not_found,
        other => CoreError::Database(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compass_redis::RedisError;

    #[test]
    fn absent_key_maps_to_the_domain_not_found() {
        let err = lookup_error(
            RedisError::NotFound("missing".to_string()),
            CoreError::PathwayNotFound("p-1".to_string()),
        );
        assert!(matches!(err, CoreError::PathwayNotFound(_)));
        assert!(err.is_not_found());
    }

    #[test]
    fn storage_failures_stay_database_errors() {
        let err = lookup_error(
            RedisError::OperationFailed("connection refused".to_string()),
            CoreError::PathwayNotFound("p-1".to_string()),
        );
        assert!(matches!(err, CoreError::Database(_)));
        assert!(!err.is_not_found());
        assert!(!err.is_conflict());
    }
}
