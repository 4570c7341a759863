//! Input token budget for a single model call.

use crate::llm::ModelInfo;
use crate::{RecapError, Result};

/// Tokens left for input once `reserved_output_tokens` are set aside for the
/// response.
///
/// A reservation that leaves no room for input is a configuration error.
pub fn input_budget(model: &ModelInfo, reserved_output_tokens: u32) -> Result<usize> {
    let reserved = reserved_output_tokens as usize;
    if reserved >= model.context_window {
        return Err(RecapError::config(format!(
            "Reserved output of {reserved} tokens leaves no input budget in a {} token context window",
            model.context_window
        )));
    }

    Ok(model.context_window - reserved)
}
