use anyhow::{anyhow, Result};
use reqwest::blocking::Client; // blocking keeps the whole loop synchronous
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::base::{Provider, Usage};
use super::configs::base::ProviderConfig;
use super::configs::groq::GroqProviderConfig;
use super::utils::{
    check_context_length_error, completion_content, messages_to_spec, response_format,
};
use crate::models::message::Message;

pub struct GroqProvider {
    client: Client,
    config: GroqProviderConfig,
}

impl GroqProvider {
    pub fn new(config: GroqProviderConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GroqProviderConfig::from_env()?)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn get_usage(data: &Value) -> Usage {
        let usage = &data["usage"];

        let input_tokens = usage["prompt_tokens"].as_i64().map(|v| v as i32);
        let output_tokens = usage["completion_tokens"].as_i64().map(|v| v as i32);
        let total_tokens = usage["total_tokens"]
            .as_i64()
            .map(|v| v as i32)
            .or_else(|| match (input_tokens, output_tokens) {
                (Some(input), Some(output)) => Some(input + output),
                _ => None,
            });

        Usage::new(input_tokens, output_tokens, total_tokens)
    }

    fn post(&self, payload: Value) -> Result<Value> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&payload)
            .send()?;

        let status = response.status();
        let body: Value = response.json().unwrap_or(Value::Null);

        if let Some(error) = body.get("error") {
            if let Some(err) = check_context_length_error(error) {
                return Err(err.into());
            }
            return Err(anyhow!("Groq API error ({}): {}", status, error));
        }

        match status {
            StatusCode::OK => Ok(body),
            status if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() >= 500 => {
                Err(anyhow!("Server error: {}", status))
            }
            status => Err(anyhow!("Request failed: {}", status)),
        }
    }
}

impl Provider for GroqProvider {
    fn complete(
        &self,
        system: &str,
        messages: &[Message],
        response_schema: &Value,
    ) -> Result<(String, Usage)> {
        let mut messages_array = vec![json!({
            "role": "system",
            "content": system
        })];
        messages_array.extend(messages_to_spec(messages)?);

        let mut payload = json!({
            "model": self.config.model,
            "messages": messages_array,
            "response_format": response_format(response_schema),
        });
        if let Some(temp) = self.config.temperature {
            payload["temperature"] = json!(temp);
        }

        debug!(
            model = %self.config.model,
            messages = messages.len(),
            "sending completion request"
        );
        let response = self.post(payload)?;

        let content = completion_content(&response)?;
        let usage = Self::get_usage(&response);
        info!(
            input_tokens = ?usage.input_tokens,
            output_tokens = ?usage.output_tokens,
            total_tokens = ?usage.total_tokens,
            "completion received"
        );

        Ok((content, usage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::configs::groq::GROQ_MODEL;
    use crate::schema::output_schema;
    use mockito::{Matcher, Server, ServerGuard};

    fn provider_for(server: &ServerGuard) -> GroqProvider {
        let mut config = GroqProviderConfig::new("test_api_key".to_string());
        config.host = server.url();
        config.temperature = Some(0.2);
        GroqProvider::new(config).unwrap()
    }

    fn completion_body(content: &str) -> String {
        json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 15}
        })
        .to_string()
    }

    #[test]
    fn test_complete_basic() -> Result<()> {
        let mut server = Server::new();
        let reply = r#"{"content":[{"action_type":"text","response_text":"Hello!"}]}"#;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test_api_key")
            .match_body(Matcher::PartialJson(json!({
                "model": GROQ_MODEL,
                "messages": [
                    {"role": "system", "content": "You are a helpful assistant."},
                    {"role": "user", "content": r#"[{"type":"text","text":"Hi"}]"#}
                ],
                "response_format": {
                    "type": "json_schema",
                    "json_schema": {"name": "orchestrator_schema"}
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(reply))
            .create();

        let provider = provider_for(&server);
        let (content, usage) = provider.complete(
            "You are a helpful assistant.",
            &[Message::user("Hi")],
            &output_schema(),
        )?;

        mock.assert();
        assert_eq!(content, reply);
        assert_eq!(usage, Usage::new(Some(12), Some(15), Some(27)));
        Ok(())
    }

    #[test]
    fn test_complete_api_error() {
        let mut server = Server::new();
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"error": {"code": "json_validate_failed", "message": "bad output"}})
                    .to_string(),
            )
            .create();

        let provider = provider_for(&server);
        let err = provider
            .complete("system", &[Message::user("Hi")], &output_schema())
            .unwrap_err();
        assert!(err.to_string().contains("json_validate_failed"), "{}", err);
    }

    #[test]
    fn test_complete_context_length_error() {
        let mut server = Server::new();
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(400)
            .with_body(
                json!({"error": {"code": "context_length_exceeded", "message": "too long"}})
                    .to_string(),
            )
            .create();

        let provider = provider_for(&server);
        let err = provider
            .complete("system", &[Message::user("Hi")], &output_schema())
            .unwrap_err();
        assert_eq!(err.to_string(), "Input message too long. Message: too long");
    }

    #[test]
    fn test_complete_server_error() {
        let mut server = Server::new();
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(503)
            .with_body("upstream unavailable")
            .create();

        let provider = provider_for(&server);
        let err = provider
            .complete("system", &[Message::user("Hi")], &output_schema())
            .unwrap_err();
        assert!(err.to_string().starts_with("Server error: 503"), "{}", err);
    }

    #[test]
    fn test_get_usage_missing() {
        let usage = GroqProvider::get_usage(&json!({}));
        assert_eq!(usage, Usage::default());
    }
}
