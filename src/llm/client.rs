//! Generator trait and a scripted mock for tests and offline runs

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{PuzzleError, Result};

/// Per-call generation options
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_instruction: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            model: super::anthropic::DEFAULT_MODEL.to_string(),
            temperature: 0.8,
            max_tokens: 1500,
            system_instruction: String::new(),
        }
    }
}

/// Stateless text generator - each call is independent.
///
/// Output may be wrapped in prose or code fences, or may not be JSON at all;
/// callers run it through [`super::extract_json`] and the validators.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce raw text for a prompt
    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String>;

    /// Default model name for this generator
    fn model(&self) -> &str;
}

/// A recorded call to [`MockGenerator`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub prompt: String,
    pub options: GenerateOptions,
}

/// Generator that replays scripted responses in order
#[derive(Debug, Default)]
pub struct MockGenerator {
    responses: Mutex<VecDeque<std::result::Result<String, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script successful responses, returned in order
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mock = Self::new();
        for r in responses {
            mock.push_response(r);
        }
        mock
    }

    pub fn push_response(&self, response: impl Into<String>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Ok(response.into()));
        }
    }

    /// Script a collaborator failure
    pub fn push_error(&self, message: impl Into<String>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Err(message.into()));
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String> {
        self.calls
            .lock()
            .map_err(|e| PuzzleError::Generator(e.to_string()))?
            .push(RecordedCall {
                prompt: prompt.to_string(),
                options: options.clone(),
            });

        let next = self
            .responses
            .lock()
            .map_err(|e| PuzzleError::Generator(e.to_string()))?
            .pop_front();

        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(PuzzleError::Generator(message)),
            None => Err(PuzzleError::Generator("no scripted response left".to_string())),
        }
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_replays_in_order() {
        let mock = MockGenerator::with_responses(["first", "second"]);
        let options = GenerateOptions::default();

        assert_eq!(mock.generate("p1", &options).await.unwrap(), "first");
        assert_eq!(mock.generate("p2", &options).await.unwrap(), "second");
        assert!(mock.generate("p3", &options).await.is_err());
        assert_eq!(mock.call_count(), 3);
        assert_eq!(mock.calls()[1].prompt, "p2");
    }

    #[tokio::test]
    async fn test_mock_scripted_error() {
        let mock = MockGenerator::new();
        mock.push_error("503 from upstream");
        let err = mock.generate("p", &GenerateOptions::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "Generator error: 503 from upstream");
    }

    #[test]
    fn test_default_options() {
        let options = GenerateOptions::default();
        assert_eq!(options.max_tokens, 1500);
        assert!((options.temperature - 0.8).abs() < f32::EPSILON);
    }
}
