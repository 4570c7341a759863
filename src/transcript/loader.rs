//! Reading transcripts from disk
//!
//! `.json` files are the primary, structured format. Anything else is read as
//! plain text, which also covers legacy `TranscriptionResult(text=...)` dumps.

use std::path::Path;

use crate::transcript::models::Transcript;
use crate::{RecapError, Result};

const LEGACY_PREFIX: &str = "TranscriptionResult(";

impl Transcript {
    /// Load a transcript file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RecapError::NotFound(format!(
                "Transcript file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let transcript = if is_json {
            Self::from_json(&content).map_err(|e| {
                RecapError::Transcript(format!("{}: {e}", path.display()))
            })?
        } else {
            tracing::debug!("Reading {} as plain text", path.display());
            Self::from_plain_text(&content)
        };

        tracing::debug!(
            chars = transcript.text.len(),
            segments = transcript.segments.len(),
            "Loaded transcript"
        );

        Ok(transcript)
    }

    /// Parse the structured JSON form.
    pub fn from_json(content: &str) -> Result<Self> {
        let mut transcript: Transcript = serde_json::from_str(content)?;
        transcript.fill_text_from_segments();
        Ok(transcript)
    }

    /// Read free text, unwrapping a legacy `TranscriptionResult(...)` dump.
    pub fn from_plain_text(content: &str) -> Self {
        let content = content.trim();
        if !content.starts_with(LEGACY_PREFIX) {
            return Self::from_text(content);
        }

        tracing::warn!("Decoding legacy TranscriptionResult dump; segments are discarded");
        let text = content
            .find("text=")
            .map(|start| {
                let rest = &content[start + "text=".len()..];
                let end = rest
                    .find("segments=")
                    .unwrap_or_else(|| rest.trim_end_matches(')').len());
                rest[..end].trim_end()
            })
            .unwrap_or_default();

        Self::from_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn json_transcript_is_fully_decoded() {
        let transcript = Transcript::from_json(
            r#"{
                "text": " Hello team.",
                "segments": [{"start": 0.0, "end": 1.5, "text": " Hello team.", "id": 0}],
                "metadata": {"language": "en"}
            }"#,
        )
        .unwrap();

        assert_eq!(transcript.text, " Hello team.");
        assert_eq!(transcript.segments.len(), 1);
        assert_eq!(transcript.segments[0].end, 1.5);
        assert_eq!(transcript.metadata["language"], "en");
    }

    #[test]
    fn empty_json_text_is_rebuilt_from_segments() {
        let transcript = Transcript::from_json(
            r#"{"segments": [
                {"start": 0.0, "end": 1.0, "text": " First part."},
                {"start": 1.0, "end": 2.0, "text": " Second part. "}
            ]}"#,
        )
        .unwrap();

        assert_eq!(transcript.text, "First part. Second part.");
    }

    #[test]
    fn plain_text_is_trimmed() {
        let transcript = Transcript::from_plain_text("\n  Just words.  \n");
        assert_eq!(transcript.text, "Just words.");
        assert!(transcript.segments.is_empty());
    }

    #[test]
    fn legacy_dump_keeps_text_field_only() {
        let transcript = Transcript::from_plain_text(
            "TranscriptionResult(text= We met today.\nsegments=[{'start': 0.0}])",
        );
        assert_eq!(transcript.text, " We met today.");
    }

    #[test]
    fn legacy_dump_without_segments_drops_closing_paren() {
        let transcript = Transcript::from_plain_text("TranscriptionResult(text=Only text)");
        assert_eq!(transcript.text, "Only text");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Transcript::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, RecapError::NotFound(_)));
        assert!(err.to_string().contains("Transcript file not found"));
    }

    #[test]
    fn invalid_json_file_is_a_transcript_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"{not json")
            .unwrap();

        let err = Transcript::load(&path).unwrap_err();
        assert!(matches!(err, RecapError::Transcript(_)));
    }

    #[test]
    fn txt_file_loads_as_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talk.txt");
        std::fs::write(&path, "A short talk.\n").unwrap();

        assert_eq!(Transcript::load(&path).unwrap().text, "A short talk.");
    }
}
