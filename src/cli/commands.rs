//! CLI command implementations

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::args::ConfigCommand;
use crate::config::Settings;
use crate::knowledge::{input_budget, Chunker, KnowledgePipeline, LlmServices};
use crate::llm::{build_provider, BpeTokenCounter, TokenCounter};
use crate::transcript::Transcript;

/// Run the full pipeline and persist `{summary, main_points}`
pub async fn extract(
    settings: &Settings,
    input: &Path,
    output: Option<PathBuf>,
    stdout: bool,
) -> Result<()> {
    let transcript = load_transcript(input)?;
    let pipeline = build_pipeline(settings)?;

    let result = pipeline
        .process(&transcript.text)
        .await
        .context("Knowledge extraction failed")?;
    let json = serde_json::to_string_pretty(&result)?;

    if stdout {
        println!("{}", json);
        return Ok(());
    }

    let path = output.unwrap_or_else(|| default_output_path(input));
    write_atomically(&path, &json)?;

    println!("Knowledge extraction completed");
    println!("Summary and main points saved to: {}", path.display());

    Ok(())
}

/// Print a summary of a transcript
pub async fn summarize(settings: &Settings, input: &Path) -> Result<()> {
    let transcript = load_transcript(input)?;
    let pipeline = build_pipeline(settings)?;

    let summary = pipeline
        .summarizer()
        .summarize(&transcript.text)
        .await
        .context("Summarization failed")?;

    println!("{}", summary);
    Ok(())
}

/// Print the main points of a transcript
pub async fn points(settings: &Settings, input: &Path) -> Result<()> {
    let transcript = load_transcript(input)?;
    let pipeline = build_pipeline(settings)?;

    let points = pipeline
        .extractor()
        .extract_main_points(&transcript.text)
        .await
        .context("Main point extraction failed")?;

    if points.is_empty() {
        println!("No main points found");
    }
    for point in points {
        println!("- {}", point);
    }

    Ok(())
}

/// Preview chunk boundaries without calling a model
pub fn show_chunks(
    settings: &Settings,
    input: &Path,
    max_tokens: Option<usize>,
    overlap: Option<f64>,
) -> Result<()> {
    let transcript = load_transcript(input)?;
    let models = settings.model_catalog();
    let model = models.default_model();

    let budget = match max_tokens {
        Some(budget) => budget,
        None => input_budget(&models.info(model), settings.params.max_summary_tokens)?,
    };
    let overlap = overlap.unwrap_or(settings.params.overlap_ratio);

    let counter = BpeTokenCounter::cl100k()?;
    let chunks = Chunker::new(&counter, model).chunk(&transcript.text, budget, overlap)?;

    println!(
        "{} chunk(s), budget {} tokens, overlap {}",
        chunks.len(),
        budget,
        overlap
    );

    for (i, chunk) in chunks.iter().enumerate() {
        println!();
        println!(
            "== Chunk {}/{} ({} tokens) ==",
            i + 1,
            chunks.len(),
            counter.count(chunk, model)
        );
        println!("{}", chunk);
    }

    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, config_path: &Path, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(&redacted(settings))?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            println!("{}", config_path.display());
        }
        ConfigCommand::Init { force } => {
            if config_path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    config_path.display()
                );
            }
            Settings::write_default(config_path)?;
            println!("Configuration initialized at: {}", config_path.display());
        }
    }

    Ok(())
}

// Helper functions

fn load_transcript(input: &Path) -> Result<Transcript> {
    tracing::info!("Loading transcript from {}...", input.display());
    let transcript = Transcript::load(input)?;

    if transcript.text.trim().is_empty() {
        tracing::warn!("Transcript {} contains no text", input.display());
    }

    Ok(transcript)
}

fn build_pipeline(settings: &Settings) -> Result<KnowledgePipeline> {
    let provider = build_provider(settings)?;
    let services = LlmServices::from_settings(settings, Arc::from(provider))?;
    Ok(KnowledgePipeline::new(services))
}

/// `<dir>/<stem>.summary.json` next to the input file.
fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("summary.json")
}

/// Write through a temporary sibling so a failed run never leaves a partial file.
fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid output path: {}", path.display()))?;
    let tmp = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    std::fs::write(&tmp, content)
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move result into {}", path.display()))?;

    Ok(())
}

fn redacted(settings: &Settings) -> Settings {
    let mut settings = settings.clone();
    if !settings.llm.api_key.is_empty() {
        settings.llm.api_key = "********".to_string();
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_replaces_extension() {
        assert_eq!(
            default_output_path(Path::new("/data/talk.json")),
            PathBuf::from("/data/talk.summary.json")
        );
        assert_eq!(
            default_output_path(Path::new("notes")),
            PathBuf::from("notes.summary.json")
        );
    }

    #[test]
    fn atomic_write_leaves_only_the_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talk.summary.json");

        write_atomically(&path, "{}").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn show_redacts_api_key() {
        let mut settings = Settings::default();
        settings.llm.api_key = "sk-secret".to_string();

        let shown = toml::to_string_pretty(&redacted(&settings)).unwrap();
        assert!(!shown.contains("sk-secret"));
        assert!(shown.contains("********"));
    }
}
