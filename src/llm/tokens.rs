//! Token counting.

use tiktoken_rs::CoreBPE;

use crate::{RecapError, Result};

/// Counts tokens of `text` as seen by `model`.
///
/// Exact tokenization differs between model families; implementations are
/// expected to approximate.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str, model: &str) -> usize;
}

/// BPE counter using the `cl100k_base` encoding for every model.
pub struct BpeTokenCounter {
    bpe: CoreBPE,
}

impl BpeTokenCounter {
    pub fn cl100k() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| RecapError::config(format!("Failed to load cl100k_base encoding: {e}")))?;
        Ok(Self { bpe })
    }
}

impl TokenCounter for BpeTokenCounter {
    fn count(&self, text: &str, _model: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}

#[cfg(test)]
const CHARS_PER_TOKEN: usize = 4;

/// Cheap stand-in for unit tests: roughly four characters per token.
///
/// Every whitespace-separated word costs at least one token, so counts are
/// additive over text joined with whitespace.
#[cfg(test)]
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct HeuristicTokenCounter;

#[cfg(test)]
impl TokenCounter for HeuristicTokenCounter {
    fn count(&self, text: &str, _model: &str) -> usize {
        text.split_whitespace()
            .map(|word| word.chars().count().div_ceil(CHARS_PER_TOKEN))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_no_tokens() {
        assert_eq!(HeuristicTokenCounter.count("", "m"), 0);
        assert_eq!(HeuristicTokenCounter.count("  \n\t ", "m"), 0);
    }

    #[test]
    fn short_words_cost_one_token_each() {
        assert_eq!(HeuristicTokenCounter.count("a bc def ghij", "m"), 4);
    }

    #[test]
    fn long_words_cost_one_token_per_four_chars() {
        // "Sentence" is 8 chars, "transcription." is 14.
        assert_eq!(HeuristicTokenCounter.count("Sentence", "m"), 2);
        assert_eq!(HeuristicTokenCounter.count("transcription.", "m"), 4);
    }

    #[test]
    fn counts_are_additive_over_whitespace() {
        let a = "The quarterly numbers were reviewed.";
        let b = "Marketing asked for more budget.";
        let joined = format!("{a} {b}");
        assert_eq!(
            HeuristicTokenCounter.count(&joined, "m"),
            HeuristicTokenCounter.count(a, "m") + HeuristicTokenCounter.count(b, "m")
        );
    }

    #[test]
    fn bpe_counts_known_english_text() {
        let counter = BpeTokenCounter::cl100k().unwrap();
        assert_eq!(counter.count("", "m"), 0);
        assert_eq!(counter.count("hello world", "m"), 2);
    }

    #[test]
    fn bpe_does_not_undercount_cjk_text() {
        let counter = BpeTokenCounter::cl100k().unwrap();
        let text = "我们今天讨论了下个季度的预算和产品发布计划".repeat(500);
        let chars = text.chars().count();

        let tokens = counter.count(&text, "m");
        assert!(tokens >= chars / 2, "{tokens} tokens for {chars} chars");
        assert!(tokens > HeuristicTokenCounter.count(&text, "m") * 2);
    }
}
