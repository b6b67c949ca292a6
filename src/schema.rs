//! The structured output contract with the model.
//!
//! Every completion must be a JSON object matching [`output_schema`]. The
//! schema is sent with the request, and [`parse_response`] checks it again on
//! the way back since the provider's enforcement is not guaranteed.
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::{AgentError, AgentResult};
use crate::models::action::Action;
use crate::models::message::{Message, Role};

/// Name the schema is registered under in the request's `response_format`
pub const SCHEMA_NAME: &str = "orchestrator_schema";

pub fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "content": {
                "type": "array",
                "description": "An ordered list of assistant actions: tool calls, responses, or error messages.",
                "items": {
                    "type": "object",
                    "properties": {
                        "action_type": {
                            "type": "string",
                            "enum": ["tool_use", "text", "error"],
                            "description": "Type of action: a tool call, direct text, or an error message."
                        },
                        "tool_name": {
                            "type": "string",
                            "description": "Name of the tool to use (required if action_type is 'tool_use')."
                        },
                        "tool_input": {
                            "type": "object",
                            "description": "Input arguments for the tool (only for 'tool_use' actions).",
                            "additionalProperties": true
                        },
                        "response_text": {
                            "type": "string",
                            "description": "If action_type is 'text', contains the assistant's natural language reply."
                        },
                        "error_message": {
                            "type": "string",
                            "description": "If action_type is 'error', provides an error explanation."
                        }
                    },
                    "required": ["action_type"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["content"],
        "additionalProperties": false
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelResponse {
    content: Vec<ModelAction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ActionType {
    ToolUse,
    Text,
    Error,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelAction {
    action_type: ActionType,
    tool_name: Option<String>,
    tool_input: Option<Value>,
    response_text: Option<String>,
    error_message: Option<String>,
}

impl ModelAction {
    fn into_action(self, index: usize) -> AgentResult<Action> {
        let missing =
            |field: &str| AgentError::ResponseParse(format!("action {} is missing '{}'", index, field));

        match self.action_type {
            ActionType::Text => {
                let text = self.response_text.ok_or_else(|| missing("response_text"))?;
                Ok(Action::text(text))
            }
            ActionType::ToolUse => {
                let tool_name = self.tool_name.ok_or_else(|| missing("tool_name"))?;
                let tool_input = self.tool_input.ok_or_else(|| missing("tool_input"))?;
                if !tool_input.is_object() {
                    return Err(AgentError::ResponseParse(format!(
                        "action {} has a non-object 'tool_input'",
                        index
                    )));
                }
                Ok(Action::tool_use(tool_name, tool_input))
            }
            ActionType::Error => Ok(Action::error(
                self.error_message
                    .unwrap_or_else(|| "no error message given".to_string()),
            )),
        }
    }
}

/// Parse the raw completion text into an assistant message.
pub fn parse_response(raw: &str) -> AgentResult<Message> {
    let response: ModelResponse =
        serde_json::from_str(raw).map_err(|e| AgentError::ResponseParse(e.to_string()))?;

    if response.content.is_empty() {
        return Err(AgentError::ResponseParse(
            "response contained no actions".to_string(),
        ));
    }

    let actions = response
        .content
        .into_iter()
        .enumerate()
        .map(|(index, action)| action.into_action(index))
        .collect::<AgentResult<Vec<_>>>()?;

    Message::new(Role::Assistant, actions).map_err(|e| AgentError::ResponseParse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text() {
        let raw = r#"{"content": [{"action_type": "text", "response_text": "Hi there"}]}"#;
        let message = parse_response(raw).unwrap();
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.content, vec![Action::text("Hi there")]);
    }

    #[test]
    fn test_parse_preserves_order() {
        let raw = json!({"content": [
            {"action_type": "text", "response_text": "Let me look"},
            {"action_type": "tool_use", "tool_name": "list_files", "tool_input": {"path": "."}},
            {"action_type": "tool_use", "tool_name": "read_file", "tool_input": {"path": "a"}}
        ]})
        .to_string();
        let message = parse_response(&raw).unwrap();
        assert_eq!(
            message.content,
            vec![
                Action::text("Let me look"),
                Action::tool_use("list_files", json!({"path": "."})),
                Action::tool_use("read_file", json!({"path": "a"})),
            ]
        );
    }

    #[test]
    fn test_parse_error_action() {
        let raw = r#"{"content": [{"action_type": "error", "error_message": "cannot comply"}]}"#;
        let message = parse_response(raw).unwrap();
        assert_eq!(message.first_error(), Some("cannot comply"));
    }

    #[test]
    fn test_parse_rejects_schema_violations() {
        let cases = [
            "not json",
            "{}",
            r#"{"content": []}"#,
            r#"{"content": [{"action_type": "dance"}]}"#,
            r#"{"content": [{"action_type": "text"}]}"#,
            r#"{"content": [{"action_type": "tool_use", "tool_input": {}}]}"#,
            r#"{"content": [{"action_type": "tool_use", "tool_name": "read_file"}]}"#,
            r#"{"content": [{"action_type": "tool_use", "tool_name": "read_file", "tool_input": "a.txt"}]}"#,
            r#"{"content": [{"action_type": "text", "response_text": "x", "extra": 1}]}"#,
            r#"{"content": [], "tool_calls": []}"#,
        ];
        for raw in cases {
            let result = parse_response(raw);
            assert!(
                matches!(result, Err(AgentError::ResponseParse(_))),
                "expected parse error for {}",
                raw
            );
        }
    }

    #[test]
    fn test_output_schema_shape() {
        let schema = output_schema();
        assert_eq!(schema["required"], json!(["content"]));
        assert_eq!(
            schema["properties"]["content"]["items"]["properties"]["action_type"]["enum"],
            json!(["tool_use", "text", "error"])
        );
    }
}
