//! Knowledge extraction for recap
//!
//! Budgeting, chunking, map-reduce summarization and main-point extraction.

mod budget;
mod chunker;
mod main_points;
mod pipeline;
mod services;
mod summarizer;

pub use budget::input_budget;
pub use chunker::Chunker;
pub use main_points::{normalize_main_points, split_bullet_lines, MainPointsExtractor};
pub use pipeline::{KnowledgePipeline, KnowledgeResult};
pub use services::{ExtractionParams, LlmServices};
pub use summarizer::{combine_sections, ChunkSummarizer, Reducer, Summarizer};
