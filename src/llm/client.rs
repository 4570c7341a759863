use async_trait::async_trait;

use crate::config::Settings;
use crate::llm::gemini::GeminiClient;
use crate::llm::openrouter::OpenRouterClient;
use crate::{RecapError, Result};

/// One completion call.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub prompt: &'a str,
    pub model: &'a str,
    pub max_tokens: u32,
    /// Overrides the provider's configured system prompt
    pub system_prompt: Option<&'a str>,
}

impl<'a> CompletionRequest<'a> {
    pub fn new(prompt: &'a str, model: &'a str, max_tokens: u32) -> Self {
        Self {
            prompt,
            model,
            max_tokens,
            system_prompt: None,
        }
    }
}

/// Raw LLM transport. Failures surface as [`RecapError::Transport`] and are
/// never retried here.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String>;
}

/// Build an LLM provider from runtime settings.
pub fn build_provider(settings: &Settings) -> Result<Box<dyn LlmProvider>> {
    match settings.llm.provider.to_lowercase().as_str() {
        "openrouter" => Ok(Box::new(OpenRouterClient::from_settings(settings)?)),
        "gemini" => Ok(Box::new(GeminiClient::from_settings(settings)?)),
        other => Err(RecapError::config(format!(
            "Unsupported llm.provider '{other}'. Supported providers: openrouter, gemini"
        ))),
    }
}
