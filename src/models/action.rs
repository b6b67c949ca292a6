use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry in a message's content list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Text { text: String },
    ToolUse { tool_name: String, tool_input: Value },
    ToolResult { content: String },
    Error { message: String },
}

impl Action {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Action::Text { text: text.into() }
    }

    pub fn tool_use<S: Into<String>>(tool_name: S, tool_input: Value) -> Self {
        Action::ToolUse {
            tool_name: tool_name.into(),
            tool_input,
        }
    }

    pub fn tool_result<S: Into<String>>(content: S) -> Self {
        Action::ToolResult {
            content: content.into(),
        }
    }

    pub fn error<S: Into<String>>(message: S) -> Self {
        Action::Error {
            message: message.into(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Action::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn as_tool_use(&self) -> Option<(&str, &Value)> {
        match self {
            Action::ToolUse {
                tool_name,
                tool_input,
            } => Some((tool_name, tool_input)),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&str> {
        match self {
            Action::Error { message } => Some(message),
            _ => None,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Action::Text { text } => format!("text:\n{}", text),
            Action::ToolUse {
                tool_name,
                tool_input,
            } => format!("tool_use:{}\ninput:{}", tool_name, tool_input),
            Action::ToolResult { content } => format!("tool_result:\n{}", content),
            Action::Error { message } => format!("error:\n{}", message),
        }
    }
}
