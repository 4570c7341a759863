//! Collaborators and parameters shared by the knowledge components.

use std::sync::Arc;

use crate::config::Settings;
use crate::knowledge::budget::input_budget;
use crate::llm::{
    BpeTokenCounter, CompletionRequest, LlmProvider, ModelCatalog, PromptCatalog,
    TokenCounter,
};
use crate::{RecapError, Result};

/// Token caps and chunking parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionParams {
    /// Output cap for single-pass and final summaries, reserved from the
    /// context window when computing the input budget
    pub max_summary_tokens: u32,
    pub chunk_summary_max_tokens: u32,
    pub extract_main_points_max_tokens: u32,
    pub format_as_json_max_tokens: u32,
    pub overlap_ratio: f64,
    /// Pass each chunk summary into the next chunk's prompt
    pub carry_context: bool,
}

impl Default for ExtractionParams {
    fn default() -> Self {
        Settings::default().extraction_params()
    }
}

impl ExtractionParams {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.overlap_ratio) {
            return Err(RecapError::config(format!(
                "params.overlap_ratio must be in [0, 1), got {}",
                self.overlap_ratio
            )));
        }
        Ok(())
    }
}

/// Everything a knowledge component needs to talk to a model.
///
/// Cheap to clone; the collaborators are shared.
#[derive(Clone)]
pub struct LlmServices {
    pub provider: Arc<dyn LlmProvider>,
    pub tokens: Arc<dyn TokenCounter>,
    pub models: Arc<ModelCatalog>,
    pub prompts: Arc<PromptCatalog>,
    pub params: ExtractionParams,
}

impl LlmServices {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tokens: Arc<dyn TokenCounter>,
        models: ModelCatalog,
        prompts: PromptCatalog,
        params: ExtractionParams,
    ) -> Self {
        Self {
            provider,
            tokens,
            models: Arc::new(models),
            prompts: Arc::new(prompts),
            params,
        }
    }

    /// Services for validated settings, counting tokens with `cl100k_base`.
    pub fn from_settings(settings: &Settings, provider: Arc<dyn LlmProvider>) -> Result<Self> {
        Ok(Self::new(
            provider,
            Arc::new(BpeTokenCounter::cl100k()?),
            settings.model_catalog(),
            settings.prompt_catalog(),
            settings.extraction_params(),
        ))
    }

    pub fn default_model(&self) -> &str {
        self.models.default_model()
    }

    /// Tokens in `text` under the default model's tokenizer.
    pub fn count_tokens(&self, text: &str) -> usize {
        self.tokens.count(text, self.default_model())
    }

    /// Input budget of the default model after reserving summary output.
    pub fn input_budget(&self) -> Result<usize> {
        input_budget(
            &self.models.info(self.default_model()),
            self.params.max_summary_tokens,
        )
    }

    /// Whether `text` needs more than one call to fit the default model.
    pub fn exceeds_budget(&self, text: &str) -> Result<bool> {
        let budget = self.input_budget()?;
        let tokens = self.count_tokens(text);
        tracing::debug!(tokens, budget, "Checked transcript against input budget");
        Ok(tokens > budget)
    }

    pub(crate) async fn complete(&self, prompt: &str, model: &str, max_tokens: u32) -> Result<String> {
        self.provider
            .complete(CompletionRequest::new(prompt, model, max_tokens))
            .await
    }
}
