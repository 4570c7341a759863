//! LLM module for recap
//!
//! Transport, token counting, model capacities and prompt templates.

mod client;
mod gemini;
pub mod models;
mod openrouter;
pub mod prompts;
mod tokens;

pub use client::{build_provider, CompletionRequest, LlmProvider};
pub use gemini::GeminiClient;
pub use models::{ModelCatalog, ModelInfo};
pub use openrouter::OpenRouterClient;
pub use prompts::PromptCatalog;
pub use tokens::{BpeTokenCounter, TokenCounter};

#[cfg(test)]
pub(crate) use tokens::HeuristicTokenCounter;
