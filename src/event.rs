//! Pipeline state-change event structures

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{NotifierError, Result};

pub const UNKNOWN_AUTHOR: &str = "Unknown";
pub const NOT_AVAILABLE: &str = "N/A";

/// Event delivered by the event source for one pipeline execution state change
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineEvent {
    /// Passed through to the notification untouched.
    #[serde(default)]
    pub time: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub detail: EventDetail,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EventDetail {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub execution_trigger: ExecutionTrigger,
}

/// What caused the pipeline run
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExecutionTrigger {
    pub author_display_name: Option<String>,
    pub author_id: Option<String>,
    pub commit_id: Option<String>,
    pub commit_message: Option<String>,
}

/// Explicit `null` reads the same as a missing record.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl PipelineEvent {
    /// Read an untyped event record into the typed schema.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| NotifierError::Validation(format!("Malformed event: {}", e)))
    }

    /// The new pipeline state, if the event carries a non-empty one.
    pub fn state(&self) -> Option<&str> {
        present(&self.detail.state)
    }

    /// Display name, then author id, then `"Unknown"`.
    pub fn author(&self) -> &str {
        let trigger = &self.detail.execution_trigger;
        present(&trigger.author_display_name)
            .or_else(|| present(&trigger.author_id))
            .unwrap_or(UNKNOWN_AUTHOR)
    }

    pub fn commit_id(&self) -> &str {
        present(&self.detail.execution_trigger.commit_id).unwrap_or(NOT_AVAILABLE)
    }

    pub fn commit_message(&self) -> &str {
        present(&self.detail.execution_trigger.commit_message).unwrap_or(NOT_AVAILABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_event() {
        let event = PipelineEvent::from_value(json!({
            "time": "2024-01-01T00:00:00Z",
            "detail": {
                "state": "SUCCEEDED",
                "execution-trigger": {
                    "author-display-name": "Alice",
                    "author-id": "alice",
                    "commit-id": "deadbeef",
                    "commit-message": "Fix build"
                }
            }
        }))
        .unwrap();

        assert_eq!(event.state(), Some("SUCCEEDED"));
        assert_eq!(event.author(), "Alice");
        assert_eq!(event.commit_id(), "deadbeef");
        assert_eq!(event.commit_message(), "Fix build");
        assert_eq!(event.time, Some(json!("2024-01-01T00:00:00Z")));
    }

    #[test]
    fn author_falls_back_to_id_then_unknown() {
        let by_id = PipelineEvent::from_value(json!({
            "detail": {"execution-trigger": {"author-id": "bob"}}
        }))
        .unwrap();
        assert_eq!(by_id.author(), "bob");

        let empty_display = PipelineEvent::from_value(json!({
            "detail": {"execution-trigger": {"author-display-name": "", "author-id": "bob"}}
        }))
        .unwrap();
        assert_eq!(empty_display.author(), "bob");

        let nobody = PipelineEvent::from_value(json!({"detail": {}})).unwrap();
        assert_eq!(nobody.author(), UNKNOWN_AUTHOR);
    }

    #[test]
    fn commit_fields_default_to_not_available() {
        let event = PipelineEvent::from_value(json!({"detail": {"state": "STARTED"}})).unwrap();
        assert_eq!(event.commit_id(), NOT_AVAILABLE);
        assert_eq!(event.commit_message(), NOT_AVAILABLE);
    }

    // Present-but-empty values get the placeholder too, rather than an empty
    // embed field value that chat endpoints tend to reject.
    #[test]
    fn empty_trigger_values_use_placeholders() {
        let event = PipelineEvent::from_value(json!({
            "detail": {"execution-trigger": {
                "author-display-name": "",
                "author-id": "",
                "commit-id": "",
                "commit-message": ""
            }}
        }))
        .unwrap();
        assert_eq!(event.author(), UNKNOWN_AUTHOR);
        assert_eq!(event.commit_id(), NOT_AVAILABLE);
        assert_eq!(event.commit_message(), NOT_AVAILABLE);
    }

    #[test]
    fn null_records_read_as_empty() {
        let trigger = PipelineEvent::from_value(json!({
            "detail": {"state": "FAILED", "execution-trigger": null}
        }))
        .unwrap();
        assert_eq!(trigger.state(), Some("FAILED"));
        assert_eq!(trigger.author(), UNKNOWN_AUTHOR);
        assert_eq!(trigger.commit_id(), NOT_AVAILABLE);

        let detail = PipelineEvent::from_value(json!({"detail": null})).unwrap();
        assert_eq!(detail.state(), None);
    }

    #[test]
    fn empty_or_missing_state_is_none() {
        let missing = PipelineEvent::from_value(json!({})).unwrap();
        assert_eq!(missing.state(), None);

        let empty = PipelineEvent::from_value(json!({"detail": {"state": ""}})).unwrap();
        assert_eq!(empty.state(), None);
    }

    #[test]
    fn wrong_types_are_validation_errors() {
        let err = PipelineEvent::from_value(json!({"detail": {"state": 42}})).unwrap_err();
        assert!(matches!(err, NotifierError::Validation(_)));

        let err = PipelineEvent::from_value(json!("not an object")).unwrap_err();
        assert!(matches!(err, NotifierError::Validation(_)));
    }

    #[test]
    fn ignores_unrelated_fields() {
        let event = PipelineEvent::from_value(json!({
            "version": "0",
            "source": "aws.codepipeline",
            "detail": {"pipeline": "build-pipeline", "state": "FAILED", "execution-id": "123"}
        }))
        .unwrap();
        assert_eq!(event.state(), Some("FAILED"));
        assert!(event.time.is_none());
    }
}
