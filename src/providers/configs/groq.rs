use anyhow::{anyhow, Context, Result};
use std::time::Duration;

use super::base::ProviderConfig;

pub const GROQ_HOST: &str = "https://api.groq.com/openai";
pub const GROQ_MODEL: &str = "meta-llama/llama-4-maverick-17b-128e-instruct";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
pub struct GroqProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub timeout: Duration,
}

impl GroqProviderConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            host: GROQ_HOST.to_string(),
            api_key,
            model: GROQ_MODEL.to_string(),
            temperature: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Load from the environment, using `api_key` instead of `GROQ_API_KEY`
    /// when one was given explicitly
    pub fn load(api_key: Option<String>) -> Result<Self> {
        let api_key = resolve_api_key(api_key, Self::get_env("GROQ_API_KEY", false, None)?)?;

        let mut config = Self::new(api_key);
        if let Some(host) = Self::get_env("GROQ_API_HOST", false, None)? {
            config.host = host;
        }
        if let Some(model) = Self::get_env("GROQ_MODEL", false, None)? {
            config.model = model;
        }
        if let Some(temperature) = Self::get_env("GROQ_TEMPERATURE", false, None)? {
            config.temperature = Some(
                temperature
                    .parse()
                    .context("GROQ_TEMPERATURE must be a number")?,
            );
        }
        if let Some(secs) = Self::get_env("GROQ_TIMEOUT_SECS", false, None)? {
            config.timeout = parse_timeout(&secs)?;
        }
        Ok(config)
    }
}

impl ProviderConfig for GroqProviderConfig {
    fn from_env() -> Result<Self> {
        Self::load(None)
    }
}

/// Pick the flag value over the environment value; blank keys count as missing
fn resolve_api_key(flag: Option<String>, env: Option<String>) -> Result<String> {
    flag.filter(|key| !key.trim().is_empty())
        .or_else(|| env.filter(|key| !key.trim().is_empty()))
        .ok_or_else(|| {
            anyhow!("API key must be provided via --api-key or GROQ_API_KEY environment variable")
        })
}

pub fn parse_timeout(secs: &str) -> Result<Duration> {
    let secs: u64 = secs
        .trim()
        .parse()
        .with_context(|| format!("invalid timeout '{}', expected whole seconds", secs))?;
    if secs == 0 {
        return Err(anyhow!("timeout must be at least one second"));
    }
    Ok(Duration::from_secs(secs))
}
