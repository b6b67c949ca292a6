use anyhow::{anyhow, Result};
use serde_json::{json, Value};

use crate::models::message::Message;
use crate::schema::SCHEMA_NAME;

/// Convert the transcript to chat-completions messages.
///
/// Each message keeps its role; its ordered actions are sent as a JSON string
/// so tool uses and tool results stay visible to the model verbatim.
pub fn messages_to_spec(messages: &[Message]) -> Result<Vec<Value>> {
    messages
        .iter()
        .map(|message| {
            Ok(json!({
                "role": message.role,
                "content": serde_json::to_string(&message.content)?,
            }))
        })
        .collect()
}

pub fn response_format(schema: &Value) -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": SCHEMA_NAME,
            "schema": schema,
        }
    })
}

/// Extract the assistant's completion text from a chat-completions response
pub fn completion_content(response: &Value) -> Result<String> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("No message content in response"))
}

#[derive(Debug, thiserror::Error)]
#[error("Input message too long. Message: {0}")]
pub struct ContextLengthError(String);

pub fn check_context_length_error(error: &Value) -> Option<ContextLengthError> {
    let code = error.get("code")?.as_str()?;
    if code == "context_length_exceeded" || code == "string_above_max_length" {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        Some(ContextLengthError(message))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::action::Action;
    use crate::models::message::Role;

    #[test]
    fn test_messages_to_spec() -> Result<()> {
        let messages = vec![
            Message::user("What is here?"),
            Message::new(
                Role::Assistant,
                vec![Action::tool_use("list_files", json!({"path": "."}))],
            )?,
            Message::tool_results(vec!["Empty directory: .".to_string()])?,
        ];

        let spec = messages_to_spec(&messages)?;

        assert_eq!(spec.len(), 3);
        assert_eq!(spec[0]["role"], "user");
        assert_eq!(spec[1]["role"], "assistant");
        assert_eq!(spec[2]["role"], "user");

        let content: Value = serde_json::from_str(spec[1]["content"].as_str().unwrap())?;
        assert_eq!(content[0]["type"], "tool_use");
        assert_eq!(content[0]["tool_name"], "list_files");

        let content: Value = serde_json::from_str(spec[2]["content"].as_str().unwrap())?;
        assert_eq!(content[0]["type"], "tool_result");
        assert_eq!(content[0]["content"], "Empty directory: .");
        Ok(())
    }

    #[test]
    fn test_response_format() {
        let format = response_format(&json!({"type": "object"}));
        assert_eq!(format["type"], "json_schema");
        assert_eq!(format["json_schema"]["name"], SCHEMA_NAME);
        assert_eq!(format["json_schema"]["schema"]["type"], "object");
    }

    #[test]
    fn test_completion_content() -> Result<()> {
        let response = json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"content\": []}"}}]
        });
        assert_eq!(completion_content(&response)?, "{\"content\": []}");

        let response = json!({"choices": []});
        assert!(completion_content(&response).is_err());
        Ok(())
    }

    #[test]
    fn test_check_context_length_error() {
        let error = json!({
            "code": "context_length_exceeded",
            "message": "This message is too long"
        });
        let result = check_context_length_error(&error);
        assert_eq!(
            result.unwrap().to_string(),
            "Input message too long. Message: This message is too long"
        );

        let error = json!({"code": "rate_limit_exceeded", "message": "Slow down"});
        assert!(check_context_length_error(&error).is_none());
    }
}
