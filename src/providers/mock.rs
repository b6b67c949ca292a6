use anyhow::{anyhow, Result};
use serde_json::Value;
use std::sync::{Arc, Mutex};

use crate::models::message::Message;
use crate::providers::base::{Provider, Usage};

/// A mock provider that returns pre-configured completions for testing
pub struct MockProvider {
    responses: Mutex<Vec<String>>,
    repeat: Option<String>,
    /// Transcript snapshots, one per request
    requests: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl MockProvider {
    /// Create a mock provider that answers with `responses` in order
    pub fn new(responses: Vec<Value>) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(Value::to_string).collect()),
            repeat: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer every request with the same raw completion text
    pub fn repeating(raw: &str) -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            repeat: Some(raw.to_string()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer with raw completion text, which need not be valid JSON
    pub fn raw(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            repeat: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle on the request log, usable after the provider is boxed
    pub fn request_log(&self) -> Arc<Mutex<Vec<Vec<Message>>>> {
        Arc::clone(&self.requests)
    }
}

impl Provider for MockProvider {
    fn complete(
        &self,
        _system: &str,
        messages: &[Message],
        _response_schema: &Value,
    ) -> Result<(String, Usage)> {
        self.requests.lock().unwrap().push(messages.to_vec());

        let mut responses = self.responses.lock().unwrap();
        if !responses.is_empty() {
            return Ok((responses.remove(0), Usage::default()));
        }
        match &self.repeat {
            Some(raw) => Ok((raw.clone(), Usage::default())),
            None => Err(anyhow!("mock provider has no more responses")),
        }
    }
}
