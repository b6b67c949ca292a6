use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::message::Message;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub total_tokens: Option<i32>,
}

impl Usage {
    pub fn new(
        input_tokens: Option<i32>,
        output_tokens: Option<i32>,
        total_tokens: Option<i32>,
    ) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }
}

/// Base trait for language model providers
pub trait Provider: Send + Sync {
    /// Request one schema-constrained completion for the transcript.
    ///
    /// Returns the raw completion text, which the caller parses against
    /// `response_schema`, together with the token usage.
    fn complete(
        &self,
        system: &str,
        messages: &[Message],
        response_schema: &Value,
    ) -> Result<(String, Usage)>;
}
