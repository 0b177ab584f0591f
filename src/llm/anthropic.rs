//! Anthropic API generator implementation
//!
//! Implements [`Generator`] over the Anthropic messages API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::error::{PuzzleError, Result};
use crate::llm::client::{GenerateOptions, Generator};

/// Anthropic API base URL
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default model to use
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Configuration for the Anthropic generator
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub model: String,
    pub timeout: Duration,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Anthropic API generator
pub struct AnthropicGenerator {
    client: Client,
    api_key: String,
    config: AnthropicConfig,
}

impl AnthropicGenerator {
    /// Create a generator, reading the API key from `api_key_env`
    pub fn from_env(api_key_env: &str, config: AnthropicConfig) -> Result<Self> {
        let api_key = std::env::var(api_key_env)
            .map_err(|_| PuzzleError::Generator(format!("{} not set", api_key_env)))?;

        Self::with_api_key(api_key, config)
    }

    /// Create a generator with an explicit API key
    pub fn with_api_key(api_key: String, config: AnthropicConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PuzzleError::Generator(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, api_key, config })
    }

    /// Build the request body for the Anthropic API
    fn build_request(&self, prompt: &str, options: &GenerateOptions) -> Value {
        let model = if options.model.is_empty() {
            self.config.model.as_str()
        } else {
            options.model.as_str()
        };

        let mut body = json!({
            "model": model,
            "max_tokens": options.max_tokens,
            "temperature": options.temperature,
            "messages": [{"role": "user", "content": prompt}]
        });

        if !options.system_instruction.is_empty() {
            body["system"] = json!(options.system_instruction);
        }

        body
    }

    /// Concatenate the text blocks of a response
    fn parse_response(body: &Value) -> Result<String> {
        let blocks = body["content"]
            .as_array()
            .ok_or_else(|| PuzzleError::Generator("Response has no content blocks".to_string()))?;

        let text: Vec<&str> = blocks
            .iter()
            .filter(|b| b["type"].as_str() == Some("text"))
            .filter_map(|b| b["text"].as_str())
            .collect();

        if text.is_empty() {
            return Err(PuzzleError::Generator("Response has no text content".to_string()));
        }
        Ok(text.join("\n"))
    }

    /// Send a request to the Anthropic API
    async fn send_request(&self, body: Value) -> Result<Value> {
        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| PuzzleError::Generator(format!("Request failed: {}", e)))?;

        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(PuzzleError::Generator(format!(
                "Rate limited, retry after {} seconds",
                retry_after
            )));
        }

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PuzzleError::Generator(format!("API error {}: {}", status, error_body)));
        }

        response
            .json()
            .await
            .map_err(|e| PuzzleError::Generator(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl Generator for AnthropicGenerator {
    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String> {
        let body = self.build_request(prompt, options);
        let response = self.send_request(body).await?;
        Self::parse_response(&response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

impl std::fmt::Debug for AnthropicGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicGenerator")
            .field("model", &self.config.model)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}
