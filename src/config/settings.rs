//! Application settings management

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::knowledge::{input_budget, ExtractionParams};
use crate::llm::prompts::{self, PromptCatalog};
use crate::llm::{ModelCatalog, ModelInfo};
use crate::{RecapError, Result};

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// LLM transport and model settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Token caps and chunking parameters
    #[serde(default)]
    pub params: ParamSettings,

    /// Prompt templates
    #[serde(default)]
    pub prompts: PromptSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// LLM provider (openrouter, gemini)
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// API key
    #[serde(default)]
    pub api_key: String,

    /// API endpoint (empty = provider default)
    #[serde(default)]
    pub endpoint: String,

    /// Default model used for summaries and bullet extraction
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Smaller model that rewrites bullets as a JSON array
    #[serde(default = "default_formatter_model")]
    pub formatter_model: String,

    /// System prompt sent with every call
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Context window assumed for models without an entry in `models`
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Output limit assumed for models without an entry in `models`
    #[serde(default = "default_max_output")]
    pub max_output: usize,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Per-model capacity overrides
    #[serde(default)]
    pub models: BTreeMap<String, ModelInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSettings {
    /// Output cap for single-pass and final summaries; also reserved from the
    /// context window when computing the input budget
    #[serde(default = "default_max_summary_tokens")]
    pub max_summary_tokens: u32,

    /// Output cap for each chunk summary
    #[serde(default = "default_chunk_summary_max_tokens")]
    pub chunk_summary_max_tokens: u32,

    /// Output cap for the bulleted main points
    #[serde(default = "default_extract_main_points_max_tokens")]
    pub extract_main_points_max_tokens: u32,

    /// Output cap for the JSON formatting call
    #[serde(default = "default_format_as_json_max_tokens")]
    pub format_as_json_max_tokens: u32,

    /// Fraction of the chunk budget repeated at the start of the next chunk
    #[serde(default = "default_overlap_ratio")]
    pub overlap_ratio: f64,

    /// Feed each chunk summary into the next chunk's prompt
    #[serde(default = "default_true")]
    pub carry_context: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSettings {
    #[serde(default = "default_single_pass_summary")]
    pub single_pass_summary: String,

    #[serde(default = "default_chunk_summary")]
    pub chunk_summary: String,

    #[serde(default = "default_chunk_summary_with_context")]
    pub chunk_summary_with_context: String,

    #[serde(default = "default_final_summary")]
    pub final_summary: String,

    #[serde(default = "default_extract_main_points_text")]
    pub extract_main_points_text: String,

    #[serde(default = "default_format_as_json_array")]
    pub format_as_json_array: String,
}

// Default value functions

fn default_log_level() -> String {
    "info".to_string()
}

fn default_llm_provider() -> String {
    "openrouter".to_string()
}

fn default_llm_model() -> String {
    "anthropic/claude-3.5-sonnet".to_string()
}

fn default_formatter_model() -> String {
    "openai/gpt-4o-mini".to_string()
}

fn default_system_prompt() -> String {
    "You are a helpful assistant.".to_string()
}

fn default_context_window() -> usize {
    200_000
}

fn default_max_output() -> usize {
    8192
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_summary_tokens() -> u32 {
    1024
}

fn default_chunk_summary_max_tokens() -> u32 {
    512
}

fn default_extract_main_points_max_tokens() -> u32 {
    1024
}

fn default_format_as_json_max_tokens() -> u32 {
    1024
}

fn default_overlap_ratio() -> f64 {
    0.25
}

fn default_true() -> bool {
    true
}

fn default_single_pass_summary() -> String {
    prompts::DEFAULT_SINGLE_PASS_SUMMARY.to_string()
}

fn default_chunk_summary() -> String {
    prompts::DEFAULT_CHUNK_SUMMARY.to_string()
}

fn default_chunk_summary_with_context() -> String {
    prompts::DEFAULT_CHUNK_SUMMARY_WITH_CONTEXT.to_string()
}

fn default_final_summary() -> String {
    prompts::DEFAULT_FINAL_SUMMARY.to_string()
}

fn default_extract_main_points_text() -> String {
    prompts::DEFAULT_EXTRACT_MAIN_POINTS_TEXT.to_string()
}

fn default_format_as_json_array() -> String {
    prompts::DEFAULT_FORMAT_AS_JSON_ARRAY.to_string()
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            api_key: String::new(),
            endpoint: String::new(),
            model: default_llm_model(),
            formatter_model: default_formatter_model(),
            system_prompt: default_system_prompt(),
            context_window: default_context_window(),
            max_output: default_max_output(),
            timeout_secs: default_timeout_secs(),
            models: BTreeMap::new(),
        }
    }
}

impl Default for ParamSettings {
    fn default() -> Self {
        Self {
            max_summary_tokens: default_max_summary_tokens(),
            chunk_summary_max_tokens: default_chunk_summary_max_tokens(),
            extract_main_points_max_tokens: default_extract_main_points_max_tokens(),
            format_as_json_max_tokens: default_format_as_json_max_tokens(),
            overlap_ratio: default_overlap_ratio(),
            carry_context: true,
        }
    }
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            single_pass_summary: default_single_pass_summary(),
            chunk_summary: default_chunk_summary(),
            chunk_summary_with_context: default_chunk_summary_with_context(),
            final_summary: default_final_summary(),
            extract_main_points_text: default_extract_main_points_text(),
            format_as_json_array: default_format_as_json_array(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load settings from a specific file, falling back to defaults when it
    /// does not exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            toml::from_str(&content).map_err(|e| {
                RecapError::config(format!(
                    "Failed to parse config file {}: {e}",
                    config_path.display()
                ))
            })?
        } else {
            Self::default()
        };

        settings.apply_env_overrides(|name| std::env::var(name).ok())?;
        settings.validate()?;

        Ok(settings)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = var("RECAP_API_KEY").or_else(|| var("OPENROUTER_API_KEY")) {
            self.llm.api_key = key;
        }
        if let Some(model) = var("RECAP_MODEL") {
            self.llm.model = model;
        }
        if let Some(model) = var("RECAP_FORMATTER_MODEL") {
            self.llm.formatter_model = model;
        }
        if let Some(prompt) = var("RECAP_SYSTEM_PROMPT") {
            self.llm.system_prompt = prompt;
        }
        if let Some(endpoint) = var("RECAP_ENDPOINT") {
            self.llm.endpoint = endpoint;
        }
        if let Some(value) = var("RECAP_CONTEXT_WINDOW") {
            self.llm.context_window = parse_env_number("RECAP_CONTEXT_WINDOW", &value)?;
        }
        if let Some(value) = var("RECAP_MAX_OUTPUT") {
            self.llm.max_output = parse_env_number("RECAP_MAX_OUTPUT", &value)?;
        }

        Ok(())
    }

    /// Reject settings the knowledge pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.llm.model.trim().is_empty() {
            return Err(RecapError::config("llm.model must not be empty"));
        }
        if self.llm.formatter_model.trim().is_empty() {
            return Err(RecapError::config("llm.formatter_model must not be empty"));
        }

        let params = &self.params;
        let caps = [
            ("params.max_summary_tokens", params.max_summary_tokens),
            ("params.chunk_summary_max_tokens", params.chunk_summary_max_tokens),
            (
                "params.extract_main_points_max_tokens",
                params.extract_main_points_max_tokens,
            ),
            ("params.format_as_json_max_tokens", params.format_as_json_max_tokens),
        ];
        if let Some((name, _)) = caps.iter().find(|(_, cap)| *cap == 0) {
            return Err(RecapError::config(format!("{name} must be greater than zero")));
        }

        self.extraction_params().validate()?;

        let models = self.model_catalog();
        input_budget(
            &models.info(models.default_model()),
            params.max_summary_tokens,
        )?;

        self.prompt_catalog().validate()
    }

    /// Model capacities described by the `[llm]` section.
    pub fn model_catalog(&self) -> ModelCatalog {
        ModelCatalog::from_settings(self)
    }

    /// Prompt templates described by the `[prompts]` section.
    pub fn prompt_catalog(&self) -> PromptCatalog {
        let p = &self.prompts;
        let mut catalog = PromptCatalog::default();
        catalog.insert(prompts::SINGLE_PASS_SUMMARY, p.single_pass_summary.as_str());
        catalog.insert(prompts::CHUNK_SUMMARY, p.chunk_summary.as_str());
        catalog.insert(
            prompts::CHUNK_SUMMARY_WITH_CONTEXT,
            p.chunk_summary_with_context.as_str(),
        );
        catalog.insert(prompts::FINAL_SUMMARY, p.final_summary.as_str());
        catalog.insert(
            prompts::EXTRACT_MAIN_POINTS_TEXT,
            p.extract_main_points_text.as_str(),
        );
        catalog.insert(prompts::FORMAT_AS_JSON_ARRAY, p.format_as_json_array.as_str());
        catalog
    }

    /// Numeric parameters described by the `[params]` section.
    pub fn extraction_params(&self) -> ExtractionParams {
        let p = &self.params;
        ExtractionParams {
            max_summary_tokens: p.max_summary_tokens,
            chunk_summary_max_tokens: p.chunk_summary_max_tokens,
            extract_main_points_max_tokens: p.extract_main_points_max_tokens,
            format_as_json_max_tokens: p.format_as_json_max_tokens,
            overlap_ratio: p.overlap_ratio,
            carry_context: p.carry_context,
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "recap", "recap")
            .ok_or_else(|| RecapError::config("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| RecapError::config(format!("Failed to serialize settings: {e}")))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

fn parse_env_number(name: &str, value: &str) -> Result<usize> {
    value.trim().parse().map_err(|_| {
        RecapError::config(format!("{name} must be a positive integer, got '{value}'"))
    })
}
