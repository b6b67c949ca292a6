use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use super::action::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A message to or from the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<Action>,
}

impl Message {
    pub fn new(role: Role, content: Vec<Action>) -> Result<Self> {
        let msg = Self { role, content };
        msg.validate()?;
        Ok(msg)
    }

    fn validate(&self) -> Result<()> {
        if self.content.is_empty() {
            return Err(anyhow!("{:?} message must include at least one action", self.role));
        }
        match self.role {
            Role::User => {
                if self.has_tool_use() || self.has_error() {
                    return Err(anyhow!("User message only supports Text and ToolResult"));
                }
            }
            Role::Assistant => {
                if self.has_tool_result() {
                    return Err(anyhow!("Assistant message does not support ToolResult"));
                }
            }
        }
        Ok(())
    }

    pub fn user(text: &str) -> Self {
        Self {
            role: Role::User,
            content: vec![Action::text(text)],
        }
    }

    pub fn assistant(text: &str) -> Self {
        Self {
            role: Role::Assistant,
            content: vec![Action::text(text)],
        }
    }

    /// A user-side message answering the tool uses of the previous assistant message
    pub fn tool_results(results: Vec<String>) -> Result<Self> {
        Self::new(
            Role::User,
            results.into_iter().map(Action::tool_result).collect(),
        )
    }

    /// The first text action, which is the answer of a finished turn
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(Action::as_text)
    }

    pub fn tool_uses(&self) -> Vec<&Action> {
        self.content
            .iter()
            .filter(|action| action.as_tool_use().is_some())
            .collect()
    }

    pub fn first_error(&self) -> Option<&str> {
        self.content.iter().find_map(Action::as_error)
    }

    pub fn has_tool_use(&self) -> bool {
        self.content
            .iter()
            .any(|a| matches!(a, Action::ToolUse { .. }))
    }

    fn has_tool_result(&self) -> bool {
        self.content
            .iter()
            .any(|a| matches!(a, Action::ToolResult { .. }))
    }

    fn has_error(&self) -> bool {
        self.content.iter().any(|a| matches!(a, Action::Error { .. }))
    }

    pub fn summary(&self) -> String {
        let summaries: Vec<String> = self.content.iter().map(|a| a.summary()).collect();
        format!("message:{:?}\n{}", self.role, summaries.join("\n"))
    }
}
