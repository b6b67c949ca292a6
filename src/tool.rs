use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool advertised to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    /// The name of the tool
    pub name: String,
    /// A description of what the tool does
    pub description: String,
    /// A json schema of the tool input
    pub input_schema: Value,
}

impl Tool {
    pub fn new<N, D>(name: N, description: D, input_schema: Value) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Tool {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Keys listed under `required` in the input schema
    pub fn required_keys(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(Value::as_array)
            .map(|keys| keys.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub input: Value,
}

impl ToolCall {
    pub fn new<S: Into<String>>(name: S, input: Value) -> Self {
        Self {
            name: name.into(),
            input,
        }
    }
}

/// Executes tool calls on behalf of the conversation loop.
///
/// Implementations never fail outward: every problem is reported as the
/// returned text so the model can read it and adapt.
pub trait ToolExecutor {
    fn tools(&self) -> &[Tool];

    fn execute(&self, tool_call: &ToolCall) -> String;
}
