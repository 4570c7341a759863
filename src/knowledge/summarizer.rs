//! Map-reduce summarization.
//!
//! Transcripts within the input budget are summarized in one call. Longer
//! ones are chunked, each chunk is summarized in order (optionally seeing the
//! previous chunk's summary) and the chunk summaries are reduced into one.

use crate::knowledge::chunker::Chunker;
use crate::knowledge::services::LlmServices;
use crate::llm::prompts::{
    CHUNK_SUMMARY, CHUNK_SUMMARY_WITH_CONTEXT, FINAL_SUMMARY, SINGLE_PASS_SUMMARY,
};
use crate::Result;

/// Summarizes one chunk with a single call.
pub struct ChunkSummarizer<'a> {
    services: &'a LlmServices,
}

impl<'a> ChunkSummarizer<'a> {
    pub fn new(services: &'a LlmServices) -> Self {
        Self { services }
    }

    pub async fn summarize_chunk(
        &self,
        chunk: &str,
        previous_summary: Option<&str>,
    ) -> Result<String> {
        let prompts = &self.services.prompts;
        let prompt = match previous_summary {
            Some(previous) => prompts.render(
                CHUNK_SUMMARY_WITH_CONTEXT,
                &[("previous_summary", previous), ("chunk", chunk)],
            )?,
            None => prompts.render(CHUNK_SUMMARY, &[("chunk", chunk)])?,
        };

        self.services
            .complete(
                &prompt,
                self.services.default_model(),
                self.services.params.chunk_summary_max_tokens,
            )
            .await
    }
}

/// Combines ordered chunk summaries into the final summary.
pub struct Reducer<'a> {
    services: &'a LlmServices,
}

impl<'a> Reducer<'a> {
    pub fn new(services: &'a LlmServices) -> Self {
        Self { services }
    }

    pub async fn reduce(&self, chunk_summaries: &[String]) -> Result<String> {
        let combined = combine_sections(chunk_summaries);
        let prompt = self
            .services
            .prompts
            .render(FINAL_SUMMARY, &[("combined_summaries", combined.as_str())])?;

        self.services
            .complete(
                &prompt,
                self.services.default_model(),
                self.services.params.max_summary_tokens,
            )
            .await
    }
}

/// Label summaries "Section N: ..." in chunk order, separated by blank lines.
pub fn combine_sections(chunk_summaries: &[String]) -> String {
    chunk_summaries
        .iter()
        .enumerate()
        .map(|(i, summary)| format!("Section {}: {}", i + 1, summary))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Chooses between single-pass and chunked summarization.
#[derive(Clone)]
pub struct Summarizer {
    services: LlmServices,
}

impl Summarizer {
    pub fn new(services: LlmServices) -> Self {
        Self { services }
    }

    pub async fn summarize(&self, transcript: &str) -> Result<String> {
        let services = &self.services;
        let model = services.default_model();
        let budget = services.input_budget()?;

        if !services.exceeds_budget(transcript)? {
            let prompt = services
                .prompts
                .render(SINGLE_PASS_SUMMARY, &[("transcript", transcript)])?;
            return services
                .complete(&prompt, model, services.params.max_summary_tokens)
                .await;
        }

        let chunks = Chunker::new(services.tokens.as_ref(), model).chunk(
            transcript,
            budget,
            services.params.overlap_ratio,
        )?;

        let chunk_summarizer = ChunkSummarizer::new(services);
        let mut summaries: Vec<String> = Vec::with_capacity(chunks.len());

        for (i, chunk) in chunks.iter().enumerate() {
            tracing::info!("Summarizing chunk {}/{}...", i + 1, chunks.len());

            let previous = if services.params.carry_context {
                summaries.last().map(String::as_str)
            } else {
                None
            };
            let summary = chunk_summarizer.summarize_chunk(chunk, previous).await?;
            summaries.push(summary);
        }

        Reducer::new(services).reduce(&summaries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_are_numbered_from_one_in_order() {
        let combined = combine_sections(&[
            "Intro and agenda.".to_string(),
            "Budget review.".to_string(),
            "Next steps.".to_string(),
        ]);

        assert_eq!(
            combined,
            "Section 1: Intro and agenda.\n\nSection 2: Budget review.\n\nSection 3: Next steps."
        );
    }

    #[test]
    fn single_summary_has_no_separator() {
        assert_eq!(combine_sections(&["Only.".to_string()]), "Section 1: Only.");
        assert_eq!(combine_sections(&[]), "");
    }
}
