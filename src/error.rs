use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// One participant whose existing meeting overlaps a proposed slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictDetail {
    pub participant: i64,
    pub conflicting_meeting: String,
    pub conflict_time: String,
}

/// Errors a tool reports back to its caller.
///
/// These are returned inline as `{"error": ...}` objects, never as protocol
/// failures.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Scheduling conflicts detected")]
    Conflict(Vec<ConflictDetail>),

    #[error("{0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ToolResult<T> = Result<T, ToolError>;

impl ToolError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ToolError::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ToolError::NotFound(msg.into())
    }

    /// Render the inline error object handed back to the caller.
    pub fn to_payload(&self) -> Value {
        match self {
            ToolError::Conflict(conflicts) => json!({
                "error": self.to_string(),
                "conflicts": conflicts,
            }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_payload() {
        let err = ToolError::not_found("Meeting M009 not found");
        assert_eq!(err.to_payload(), json!({"error": "Meeting M009 not found"}));
    }

    #[test]
    fn test_conflict_payload_carries_details() {
        let err = ToolError::Conflict(vec![ConflictDetail {
            participant: 2,
            conflicting_meeting: "Standup".to_string(),
            conflict_time: "2025-10-01T09:00:00Z".to_string(),
        }]);
        let payload = err.to_payload();
        assert_eq!(payload["error"], "Scheduling conflicts detected");
        assert_eq!(payload["conflicts"][0]["participant"], 2);
        assert_eq!(payload["conflicts"][0]["conflicting_meeting"], "Standup");
    }
}
