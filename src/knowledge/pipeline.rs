//! Summary plus main points for one transcript.

use serde::{Deserialize, Serialize};

use crate::knowledge::main_points::MainPointsExtractor;
use crate::knowledge::services::LlmServices;
use crate::knowledge::summarizer::Summarizer;
use crate::Result;

/// The persisted extraction result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeResult {
    pub summary: String,
    pub main_points: Vec<String>,
}

pub struct KnowledgePipeline {
    summarizer: Summarizer,
    extractor: MainPointsExtractor,
}

impl KnowledgePipeline {
    pub fn new(services: LlmServices) -> Self {
        Self {
            summarizer: Summarizer::new(services.clone()),
            extractor: MainPointsExtractor::new(services),
        }
    }

    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    pub fn extractor(&self) -> &MainPointsExtractor {
        &self.extractor
    }

    /// Run summarization and main-point extraction. Either failing fails the
    /// whole run.
    pub async fn process(&self, transcript: &str) -> Result<KnowledgeResult> {
        tracing::info!("Generating summary...");
        let summary = self.summarizer.summarize(transcript).await?;

        tracing::info!("Extracting main points...");
        let main_points = self.extractor.extract_main_points(transcript).await?;

        Ok(KnowledgeResult {
            summary,
            main_points,
        })
    }
}
