//! Sentence-preserving chunking with word overlap.
//!
//! Sentences are found with a plain `". "` delimiter, which is a heuristic and
//! not a sentence tokenizer. Overlap between consecutive chunks is measured in
//! words, using `floor(max_tokens * overlap_ratio)` as the word count.

use crate::llm::TokenCounter;
use crate::{RecapError, Result};

const SENTENCE_DELIMITER: &str = ". ";

/// Splits text into chunks that fit a token budget under one model's tokenizer.
pub struct Chunker<'a> {
    tokens: &'a dyn TokenCounter,
    model: &'a str,
}

impl<'a> Chunker<'a> {
    pub fn new(tokens: &'a dyn TokenCounter, model: &'a str) -> Self {
        Self { tokens, model }
    }

    /// Split `text` into ordered chunks of at most `max_tokens` tokens.
    ///
    /// Text already within budget comes back unchanged as a single chunk. A
    /// sentence that alone exceeds the budget is emitted as its own chunk and
    /// the following chunk starts without overlap.
    pub fn chunk(&self, text: &str, max_tokens: usize, overlap_ratio: f64) -> Result<Vec<String>> {
        if max_tokens == 0 {
            return Err(RecapError::config("Chunk budget must be greater than zero"));
        }
        if !(0.0..1.0).contains(&overlap_ratio) {
            return Err(RecapError::config(format!(
                "Overlap ratio must be in [0, 1), got {overlap_ratio}"
            )));
        }

        if self.count(text) <= max_tokens {
            return Ok(vec![text.to_string()]);
        }

        let overlap_words = (max_tokens as f64 * overlap_ratio).floor() as usize;
        let mut chunks = Vec::new();
        let mut current = String::new();

        for sentence in split_sentences(text) {
            let candidate = join(&current, &sentence);
            if self.count(&candidate) <= max_tokens {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                let overlap = tail_words(&current, overlap_words);
                chunks.push(std::mem::take(&mut current));

                if self.count(&sentence) <= max_tokens {
                    current = self.open_with_overlap(&overlap, &sentence, max_tokens);
                    continue;
                }
            }

            tracing::warn!(
                tokens = self.count(&sentence),
                max_tokens,
                "Sentence exceeds chunk budget, emitting it unsplit"
            );
            chunks.push(sentence);
        }

        if !current.trim().is_empty() {
            chunks.push(current);
        }

        tracing::debug!(chunks = chunks.len(), max_tokens, overlap_words, "Chunked transcript");

        Ok(chunks)
    }

    fn count(&self, text: &str) -> usize {
        self.tokens.count(text, self.model)
    }

    /// Seed a new chunk with the overlap words followed by `sentence`,
    /// dropping leading overlap words until it fits.
    fn open_with_overlap(&self, overlap: &[String], sentence: &str, max_tokens: usize) -> String {
        (0..overlap.len())
            .map(|skip| join(&overlap[skip..].join(" "), sentence))
            .find(|seeded| self.count(seeded) <= max_tokens)
            .unwrap_or_else(|| sentence.to_string())
    }
}

/// Sentence units with their terminating period restored.
fn split_sentences(text: &str) -> Vec<String> {
    text.split(SENTENCE_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.ends_with(['.', '!', '?']) {
                s.to_string()
            } else {
                format!("{s}.")
            }
        })
        .collect()
}

fn tail_words(text: &str, count: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words[words.len().saturating_sub(count)..]
        .iter()
        .map(|w| w.to_string())
        .collect()
}

fn join(head: &str, sentence: &str) -> String {
    if head.is_empty() {
        sentence.to_string()
    } else {
        format!("{head} {sentence}")
    }
}
