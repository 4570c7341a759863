//! Transcript data model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Output of the transcription stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Full transcript text
    #[serde(default)]
    pub text: String,

    /// Timed segments in order
    #[serde(default)]
    pub segments: Vec<Segment>,

    /// Free-form metadata (language, probabilities, source)
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// A timed piece of transcribed text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,

    /// Transcribed text
    pub text: String,
}

impl Transcript {
    /// Transcript with text only.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Rebuild `text` from the segments when it is empty.
    pub fn fill_text_from_segments(&mut self) {
        if !self.text.trim().is_empty() || self.segments.is_empty() {
            return;
        }

        self.text = self
            .segments
            .iter()
            .map(|segment| segment.text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
    }
}
