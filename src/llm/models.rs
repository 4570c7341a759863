//! Model capacity lookup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::Settings;

/// Capacity constraints of a named model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Maximum input + output tokens
    pub context_window: usize,

    /// Maximum tokens the model will generate
    pub max_output: usize,
}

/// Known models plus the default and formatter model names.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    default_model: String,
    formatter_model: String,
    fallback: ModelInfo,
    models: BTreeMap<String, ModelInfo>,
}

impl ModelCatalog {
    /// Catalog where every model reports `fallback` until overridden.
    pub fn new(
        default_model: impl Into<String>,
        formatter_model: impl Into<String>,
        fallback: ModelInfo,
    ) -> Self {
        Self {
            default_model: default_model.into(),
            formatter_model: formatter_model.into(),
            fallback,
            models: BTreeMap::new(),
        }
    }

    pub fn with_model(mut self, name: impl Into<String>, info: ModelInfo) -> Self {
        self.models.insert(name.into(), info);
        self
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let llm = &settings.llm;
        let fallback = ModelInfo {
            context_window: llm.context_window,
            max_output: llm.max_output,
        };

        llm.models.iter().fold(
            Self::new(llm.model.trim(), llm.formatter_model.trim(), fallback),
            |catalog, (name, info)| catalog.with_model(name.clone(), *info),
        )
    }

    pub fn info(&self, model: &str) -> ModelInfo {
        self.models.get(model).copied().unwrap_or(self.fallback)
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn formatter_model(&self) -> &str {
        &self.formatter_model
    }
}
