//! Event payload delivered by the host on stdin.
//!
//! The host sends one JSON document per invocation describing the file
//! operation it is about to perform (or just performed). Hooks receive this
//! document verbatim on their own stdin; the engine only inspects
//! `tool_name` for matcher filtering.

use serde::{Deserialize, Serialize};

/// Host lifecycle point at which hooks fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookEvent {
    PreToolUse,
    PostToolUse,
}

impl HookEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreToolUse => "PreToolUse",
            Self::PostToolUse => "PostToolUse",
        }
    }
}

impl std::str::FromStr for HookEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PreToolUse" => Ok(Self::PreToolUse),
            "PostToolUse" => Ok(Self::PostToolUse),
            other => Err(format!("unknown hook event: {other}")),
        }
    }
}

/// A single edit within a multi-edit operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditOp {
    pub old_string: String,
    pub new_string: String,
}

/// Input of the host tool call the event describes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edits: Option<Vec<EditOp>>,
}

/// One file-operation event, read once from stdin per invocation.
///
/// Read-only to all hooks; the engine never mutates it after parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: ToolInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl Event {
    /// Serialize the event back to the JSON form hooks receive on stdin.
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_write_event() {
        let raw = r#"{
            "tool_name": "Write",
            "tool_input": {"file_path": "src/app.js", "content": "console.log(1)"},
            "prompt": "add logging"
        }"#;
        let event: Event = serde_json::from_str(raw).unwrap();
        assert_eq!(event.tool_name, "Write");
        assert_eq!(event.tool_input.file_path.as_deref(), Some("src/app.js"));
        assert_eq!(event.prompt.as_deref(), Some("add logging"));
    }

    #[test]
    fn parses_multi_edit_event() {
        let raw = r#"{
            "tool_name": "MultiEdit",
            "tool_input": {
                "file_path": "lib/util.js",
                "edits": [{"old_string": "a", "new_string": "b"}]
            }
        }"#;
        let event: Event = serde_json::from_str(raw).unwrap();
        let edits = event.tool_input.edits.unwrap();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].new_string, "b");
    }

    #[test]
    fn payload_round_trips() {
        let event = Event {
            tool_name: "Edit".into(),
            tool_input: ToolInput {
                file_path: Some("a.rs".into()),
                old_string: Some("x".into()),
                new_string: Some("y".into()),
                ..Default::default()
            },
            prompt: None,
        };
        let payload = event.to_payload().unwrap();
        let back: Event = serde_json::from_str(&payload).unwrap();
        assert_eq!(back.tool_name, "Edit");
    }

    #[test]
    fn hook_event_parses_from_str() {
        assert_eq!("PreToolUse".parse::<HookEvent>(), Ok(HookEvent::PreToolUse));
        assert!("Unknown".parse::<HookEvent>().is_err());
    }
}
