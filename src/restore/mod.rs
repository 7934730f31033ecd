use async_trait::async_trait;

pub mod chunk;
pub mod remote;

pub use chunk::chunk_text;
pub use remote::RemotePunctuationModel;

use crate::text;

/// Errors from the punctuation model service
#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("Model request failed: {0}")]
    RequestFailed(String),

    #[error("Model returned an unusable response: {0}")]
    BadResponse(String),

    #[error("No punctuation model endpoint is configured")]
    NotConfigured,
}

/// Trait for punctuation-restoration backends.
///
/// Input is raw unpunctuated text; output is the same text with punctuation
/// marks inserted. The concrete model stays swappable behind this seam.
#[async_trait]
pub trait PunctuationModel: Send + Sync {
    /// Restore punctuation for one bounded-length piece of text
    async fn restore(&self, text: &str) -> Result<String, ModelError>;

    /// Maximum input length in characters, if the model has one
    fn max_input_chars(&self) -> Option<usize> {
        None
    }
}

/// Runs the punctuation model over assembled text and capitalizes the result
pub struct PunctuationRestorer {
    model: Box<dyn PunctuationModel>,
}

impl PunctuationRestorer {
    pub fn new(model: Box<dyn PunctuationModel>) -> Self {
        Self { model }
    }

    /// Restore punctuation and sentence capitalization.
    ///
    /// Empty input passes through without invoking the model. Text over the
    /// model's input limit is split at whitespace boundaries, restored chunk
    /// by chunk, and rejoined; punctuation right at chunk boundaries has no
    /// cross-chunk context and is best-effort.
    pub async fn restore(&self, text: &str) -> Result<String, ModelError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let chunks = match self.model.max_input_chars() {
            Some(limit) if text.chars().count() > limit => chunk_text(text, limit),
            _ => vec![text.to_string()],
        };

        tracing::debug!("Restoring punctuation over {} chunk(s)", chunks.len());

        let mut restored = String::new();
        for chunk in &chunks {
            let piece = self.model.restore(chunk).await?;
            let piece = piece.trim();
            if piece.is_empty() {
                continue;
            }
            if !restored.is_empty() {
                restored.push(' ');
            }
            restored.push_str(piece);
        }

        Ok(text::capitalize_sentences(&restored))
    }
}
