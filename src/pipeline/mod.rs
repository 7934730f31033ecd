use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use uuid::Uuid;

use crate::artifact::{ArtifactStore, TranscriptArtifact};
use crate::config::Config;
use crate::fetch::retry::RetryPolicy;
use crate::fetch::youtube::YoutubeCaptionClient;
use crate::fetch::{CaptionSource, VideoId, VideoInfo};
use crate::restore::{ModelError, PunctuationModel, PunctuationRestorer, RemotePunctuationModel};
use crate::text;
use crate::utils;
use crate::{Result, TranscriptError};

/// One transcript generation request
#[derive(Debug, Clone)]
pub struct TranscriptRequest {
    /// Video URL or bare id
    pub reference: String,

    /// Caption language code
    pub language: String,

    /// Run the punctuation/capitalization pass
    pub punctuate: bool,

    /// Custom artifact name, without extension
    pub file_name: Option<String>,
}

/// Result of a completed transcript request
pub struct TranscriptOutcome {
    /// The written transcript file, alive until dropped
    pub artifact: TranscriptArtifact,

    /// Metadata of the video the captions came from
    pub video: VideoInfo,

    /// Final transcript text, as written to the artifact
    pub text: String,

    /// Set when punctuation was requested but the model was unavailable;
    /// carries the user-visible notice
    pub punctuation_warning: Option<String>,

    /// Timestamp when the request completed
    pub completed_at: DateTime<Utc>,
}

/// Main transcript pipeline: fetch, assemble, optionally restore, write.
///
/// Stages run strictly in sequence within one request; the hosting caller is
/// responsible for isolating concurrent requests.
pub struct TranscriptPipeline {
    source: Box<dyn CaptionSource>,
    restorer: Option<PunctuationRestorer>,
    retry: RetryPolicy,
    quiet: bool,
}

impl TranscriptPipeline {
    /// Create a pipeline wired to the configured caption service and model
    pub fn new(config: &Config) -> Result<Self> {
        let source = YoutubeCaptionClient::new(Duration::from_secs(
            config.fetch.request_timeout_secs,
        ))?;

        let restorer = match &config.restore.endpoint {
            Some(endpoint) => {
                let model = RemotePunctuationModel::new(
                    endpoint.clone(),
                    config.restore.api_token.clone(),
                    config.restore.max_chunk_chars,
                    Duration::from_secs(config.restore.request_timeout_secs),
                )?;
                Some(PunctuationRestorer::new(Box::new(model)))
            }
            None => None,
        };

        let retry = RetryPolicy::new(
            config.fetch.max_attempts,
            Duration::from_millis(config.fetch.base_backoff_ms),
        );

        Ok(Self {
            source: Box::new(source),
            restorer,
            retry,
            quiet: false,
        })
    }

    /// Replace the caption source (tests inject scripted sources here)
    pub fn with_source(mut self, source: Box<dyn CaptionSource>) -> Self {
        self.source = source;
        self
    }

    /// Replace the punctuation model
    pub fn with_model(mut self, model: Box<dyn PunctuationModel>) -> Self {
        self.restorer = Some(PunctuationRestorer::new(model));
        self
    }

    /// Override the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Suppress progress indicators
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Run the full pipeline for one request
    pub async fn generate(
        &self,
        request: &TranscriptRequest,
    ) -> std::result::Result<TranscriptOutcome, TranscriptError> {
        let request_id = Uuid::new_v4();
        tracing::info!(
            "Transcript request {} for {} (language {}, punctuate {})",
            request_id,
            request.reference,
            request.language,
            request.punctuate
        );

        let video_id = VideoId::parse(&request.reference)?;

        let progress = self.spinner("Fetching captions...");
        let fetched = self
            .retry
            .run(|| self.source.fetch(&video_id, &request.language))
            .await?;
        progress.finish_and_clear();

        if let Some(length) = fetched.video.length_seconds {
            tracing::info!(
                "Video length {}, {} caption fragments",
                utils::format_duration(length as f64),
                fetched.fragments.len()
            );
        }

        let assembled = text::assemble(&fetched.fragments);

        let (final_text, punctuation_warning) = if request.punctuate && !assembled.is_empty() {
            let progress = self.spinner("Restoring punctuation...");
            let result = self.restore_with_fallback(&assembled).await;
            progress.finish_and_clear();
            result
        } else {
            (assembled, None)
        };

        let suggested_name = request
            .file_name
            .clone()
            .or_else(|| fetched.video.title.clone())
            .unwrap_or_else(|| video_id.as_str().to_string());

        let store = ArtifactStore::for_request()?;
        let artifact = store.write(&final_text, &suggested_name)?;

        tracing::info!("Transcript request {} completed", request_id);

        Ok(TranscriptOutcome {
            artifact,
            video: fetched.video,
            text: final_text,
            punctuation_warning,
            completed_at: Utc::now(),
        })
    }

    /// Run the restoration stage, degrading to the raw assembled text when
    /// the model cannot be reached.
    async fn restore_with_fallback(&self, assembled: &str) -> (String, Option<String>) {
        let result = match &self.restorer {
            Some(restorer) => restorer.restore(assembled).await,
            None => Err(ModelError::NotConfigured),
        };

        match result {
            Ok(restored) => (restored, None),
            Err(err) => {
                let err = TranscriptError::ModelUnavailable(err.to_string());
                let notice = format!("{}; emitting unpunctuated transcript", err);
                tracing::warn!("{}", notice);
                (assembled.to_string(), Some(notice))
            }
        }
    }

    fn spinner(&self, message: &str) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        progress.set_message(message.to_string());
        progress
    }
}
