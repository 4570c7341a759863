//! Configuration module for recap
//!
//! Handles loading settings from TOML files and environment overrides.

mod settings;

pub use settings::{GeneralSettings, LlmSettings, ParamSettings, PromptSettings, Settings};
