//! Transcript module for recap
//!
//! The transcript produced by the transcription stage and its file formats.

mod loader;
mod models;

pub use models::{Segment, Transcript};
