use serde_json::Value;
use tracing::{info, warn};

use crate::errors::{AgentError, AgentResult};
use crate::models::message::Message;
use crate::prompt_template::system_prompt;
use crate::providers::base::Provider;
use crate::schema::{output_schema, parse_response};
use crate::tool::{ToolCall, ToolExecutor};

/// Tool rounds allowed in one turn before it is abandoned
pub const DEFAULT_MAX_ROUNDS: usize = 25;

/// Agent drives the conversation: it owns the transcript, asks the provider
/// for the next structured response and runs the requested tools until the
/// model answers with text.
pub struct Agent {
    provider: Box<dyn Provider>,
    executor: Box<dyn ToolExecutor>,
    messages: Vec<Message>,
    response_schema: Value,
    max_rounds: usize,
}

impl Agent {
    pub fn new(provider: Box<dyn Provider>, executor: Box<dyn ToolExecutor>) -> Self {
        Self {
            provider,
            executor,
            messages: Vec::new(),
            response_schema: output_schema(),
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Limit the tool rounds of a single turn; at least one round is always allowed
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    /// The transcript of this session so far
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Forget the transcript and start a fresh session
    pub fn reset(&mut self) {
        self.messages.clear();
    }

    pub fn system_prompt(&self) -> AgentResult<String> {
        system_prompt(self.executor.tools()).map_err(|e| AgentError::Internal(e.to_string()))
    }

    /// Run one turn for `user_text` and return the model's final text.
    ///
    /// A failed turn leaves the session usable: the error is returned and the
    /// transcript keeps everything appended before the failure.
    pub fn chat(&mut self, user_text: &str) -> AgentResult<String> {
        self.messages.push(Message::user(user_text));
        info!(chars = user_text.chars().count(), "turn started");

        let result = self
            .system_prompt()
            .and_then(|system| self.run_rounds(&system));
        match &result {
            Ok(_) => info!(messages = self.messages.len(), "turn finished"),
            Err(e) => warn!(error = %e, "turn failed"),
        }
        result
    }

    fn run_rounds(&mut self, system: &str) -> AgentResult<String> {
        let mut rounds = 0;
        loop {
            let (raw, _usage) = self
                .provider
                .complete(system, &self.messages, &self.response_schema)
                .map_err(|e| AgentError::Provider(format!("{:#}", e)))?;
            let response = parse_response(&raw)?;

            let tool_calls: Vec<ToolCall> = response
                .content
                .iter()
                .filter_map(|action| action.as_tool_use())
                .map(|(name, input)| ToolCall::new(name, input.clone()))
                .collect();

            if tool_calls.is_empty() {
                let answer = response.first_text().map(str::to_string);
                let model_error = response.first_error().map(str::to_string);
                self.messages.push(response);
                return match (answer, model_error) {
                    (Some(text), _) => Ok(text),
                    (None, Some(message)) => Err(AgentError::ModelError(message)),
                    (None, None) => Err(AgentError::ResponseParse(
                        "response had neither text nor tool uses".to_string(),
                    )),
                };
            }

            self.messages.push(response);
            rounds += 1;
            info!(round = rounds, tool_calls = tool_calls.len(), "dispatching tools");

            let results = tool_calls
                .iter()
                .map(|call| self.executor.execute(call))
                .collect();
            let message =
                Message::tool_results(results).map_err(|e| AgentError::Internal(e.to_string()))?;
            self.messages.push(message);

            if rounds >= self.max_rounds {
                return Err(AgentError::TurnLimitExceeded(rounds));
            }
        }
    }
}
