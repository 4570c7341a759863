//! Main-point extraction.
//!
//! The default model lists the main points as free-form bullets, then the
//! formatter model rewrites them as a JSON array. When the formatter output is
//! not a JSON array of strings the bullets are split line by line instead.

use std::borrow::Cow;

use crate::knowledge::services::LlmServices;
use crate::knowledge::summarizer::Summarizer;
use crate::llm::prompts::{EXTRACT_MAIN_POINTS_TEXT, FORMAT_AS_JSON_ARRAY};
use crate::Result;

const BULLET_MARKERS: [char; 3] = ['-', '*', '•'];

#[derive(Clone)]
pub struct MainPointsExtractor {
    services: LlmServices,
    summarizer: Summarizer,
}

impl MainPointsExtractor {
    pub fn new(services: LlmServices) -> Self {
        Self {
            summarizer: Summarizer::new(services.clone()),
            services,
        }
    }

    pub async fn extract_main_points(&self, transcript: &str) -> Result<Vec<String>> {
        let services = &self.services;

        let source_text = if services.exceeds_budget(transcript)? {
            tracing::info!("Transcript exceeds input budget, extracting points from its summary");
            Cow::Owned(self.summarizer.summarize(transcript).await?)
        } else {
            Cow::Borrowed(transcript)
        };

        let prompt = services.prompts.render(
            EXTRACT_MAIN_POINTS_TEXT,
            &[("source_text", &*source_text)],
        )?;
        let bullet_points = services
            .complete(
                &prompt,
                services.default_model(),
                services.params.extract_main_points_max_tokens,
            )
            .await?;

        let prompt = services.prompts.render(
            FORMAT_AS_JSON_ARRAY,
            &[("bullet_points", bullet_points.as_str())],
        )?;
        let formatted = services
            .complete(
                &prompt,
                services.models.formatter_model(),
                services.params.format_as_json_max_tokens,
            )
            .await?;

        Ok(normalize_main_points(&formatted, &bullet_points))
    }
}

/// Parse the formatter's JSON array, falling back to the bulleted text.
///
/// Never fails: malformed formatter output yields the fallback split.
pub fn normalize_main_points(formatter_output: &str, bullet_points: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(strip_code_fence(formatter_output)) {
        Ok(points) if !points.is_empty() => points,
        Ok(_) => {
            tracing::warn!("Formatter returned an empty JSON array, falling back to line splitting");
            split_bullet_lines(bullet_points)
        }
        Err(err) => {
            tracing::warn!(
                error = %err,
                "Formatter output is not a JSON array of strings, falling back to line splitting"
            );
            split_bullet_lines(bullet_points)
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = body.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// One point per non-empty line, without leading bullet markers.
pub fn split_bullet_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            line.trim_start_matches(|c: char| BULLET_MARKERS.contains(&c) || c.is_whitespace())
        })
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
