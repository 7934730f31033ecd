//! Caption Scribe - A Rust CLI tool for turning YouTube caption tracks into transcripts
//!
//! This library fetches the caption track of a video, assembles it into continuous
//! text, optionally restores punctuation and capitalization through an external
//! sequence model, and writes the result as a downloadable UTF-8 artifact.

pub mod artifact;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod pipeline;
pub mod restore;
pub mod text;
pub mod utils;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use fetch::{CaptionFragment, CaptionSource, FetchedTranscript, VideoId, VideoInfo};
pub use pipeline::{TranscriptOutcome, TranscriptPipeline, TranscriptRequest};
pub use restore::{PunctuationModel, PunctuationRestorer};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the transcript pipeline
#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    #[error("Invalid video reference: {0}")]
    InvalidReference(String),

    #[error("Video {0} has no caption track for the requested language")]
    NoCaptionsAvailable(String),

    #[error("Video {id} is unavailable: {reason}")]
    VideoUnavailable { id: String, reason: String },

    #[error("Caption fetch failed after {attempts} attempts: {last}")]
    FetchExhausted { attempts: u32, last: String },

    #[error("Punctuation model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Failed to write transcript artifact: {0}")]
    StorageWriteFailed(String),
}
