//! End-to-end pipeline tests with scripted caption sources and stub models.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use caption_scribe::fetch::retry::RetryPolicy;
use caption_scribe::fetch::{CaptionSource, FetchError, FetchedTranscript};
use caption_scribe::restore::{ModelError, PunctuationModel};
use caption_scribe::{
    CaptionFragment, Config, TranscriptPipeline, TranscriptRequest, VideoId, VideoInfo,
};
use caption_scribe::TranscriptError;

/// Behavior mode for the scripted caption source
#[derive(Clone)]
enum SourceBehavior {
    /// Always succeeds with the given fragments
    Working(Vec<CaptionFragment>),
    /// Fails transiently for the first `failures` calls, then succeeds
    FlakyThenWorking {
        failures: usize,
        fragments: Vec<CaptionFragment>,
    },
    /// Always fails transiently
    AlwaysTransient,
    /// Video exists but has no caption track
    NoCaptions,
}

struct ScriptedSource {
    behavior: SourceBehavior,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
    fn new(behavior: SourceBehavior) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                behavior,
                calls: calls.clone(),
            },
            calls,
        )
    }

    fn success(&self, video: &VideoId, fragments: &[CaptionFragment]) -> FetchedTranscript {
        FetchedTranscript {
            video: VideoInfo {
                id: video.as_str().to_string(),
                title: Some("Test Video".to_string()),
                author: Some("Test Channel".to_string()),
                length_seconds: Some(3),
            },
            fragments: fragments.to_vec(),
        }
    }
}

#[async_trait]
impl CaptionSource for ScriptedSource {
    async fn fetch(
        &self,
        video: &VideoId,
        _language: &str,
    ) -> Result<FetchedTranscript, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        match &self.behavior {
            SourceBehavior::Working(fragments) => Ok(self.success(video, fragments)),
            SourceBehavior::FlakyThenWorking {
                failures,
                fragments,
            } => {
                if call <= *failures {
                    Err(FetchError::Transient(format!("connection reset ({call})")))
                } else {
                    Ok(self.success(video, fragments))
                }
            }
            SourceBehavior::AlwaysTransient => {
                Err(FetchError::Transient("connection reset".to_string()))
            }
            SourceBehavior::NoCaptions => Err(FetchError::Fatal(
                TranscriptError::NoCaptionsAvailable(video.as_str().to_string()),
            )),
        }
    }
}

/// Stub model that always answers with a fixed string
struct FixedModel {
    output: String,
    calls: Arc<AtomicUsize>,
}

impl FixedModel {
    fn new(output: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                output: output.to_string(),
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl PunctuationModel for FixedModel {
    async fn restore(&self, _text: &str) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.output.clone())
    }
}

/// Stub model that can never be reached
struct DownModel;

#[async_trait]
impl PunctuationModel for DownModel {
    async fn restore(&self, _text: &str) -> Result<String, ModelError> {
        Err(ModelError::RequestFailed("connection refused".to_string()))
    }
}

fn sample_fragments() -> Vec<CaptionFragment> {
    vec![
        CaptionFragment::new("hello world", 0.0, 1.0),
        CaptionFragment::new("how are you", 1.0, 2.0),
    ]
}

fn pipeline_with(source: ScriptedSource) -> TranscriptPipeline {
    TranscriptPipeline::new(&Config::default())
        .expect("pipeline construction")
        .with_source(Box::new(source))
        .with_retry(RetryPolicy::new(3, Duration::ZERO))
        .with_quiet(true)
}

fn request(reference: &str, punctuate: bool) -> TranscriptRequest {
    TranscriptRequest {
        reference: reference.to_string(),
        language: "en".to_string(),
        punctuate,
        file_name: None,
    }
}

#[tokio::test]
async fn test_raw_transcript_end_to_end() {
    let (source, _) = ScriptedSource::new(SourceBehavior::Working(sample_fragments()));
    let pipeline = pipeline_with(source);

    let outcome = pipeline.generate(&request("abc123XYZ0", false)).await.unwrap();

    assert_eq!(outcome.text, "hello world how are you");
    assert_eq!(outcome.artifact.read_text().unwrap(), "hello world how are you");
    assert_eq!(outcome.artifact.file_name(), "Test Video.md");
    assert!(outcome.punctuation_warning.is_none());
    assert_eq!(outcome.video.id, "abc123XYZ0");
}

#[tokio::test]
async fn test_punctuated_transcript_end_to_end() {
    let (source, _) = ScriptedSource::new(SourceBehavior::Working(sample_fragments()));
    let (model, model_calls) = FixedModel::new("Hello world. How are you?");
    let pipeline = pipeline_with(source).with_model(Box::new(model));

    let outcome = pipeline.generate(&request("abc123XYZ0", true)).await.unwrap();

    // Already capitalized, so the capitalization pass changes nothing
    assert_eq!(outcome.text, "Hello world. How are you?");
    assert_eq!(outcome.artifact.read_text().unwrap(), "Hello world. How are you?");
    assert_eq!(model_calls.load(Ordering::SeqCst), 1);
    assert!(outcome.punctuation_warning.is_none());
}

#[tokio::test]
async fn test_transient_failures_are_retried_to_success() {
    let (source, calls) = ScriptedSource::new(SourceBehavior::FlakyThenWorking {
        failures: 2,
        fragments: sample_fragments(),
    });
    let pipeline = pipeline_with(source);

    let outcome = pipeline.generate(&request("abc123XYZ0", false)).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(outcome.text, "hello world how are you");
}

#[tokio::test]
async fn test_persistent_transient_failure_exhausts_retries() {
    let (source, calls) = ScriptedSource::new(SourceBehavior::AlwaysTransient);
    let pipeline = pipeline_with(source);

    let err = pipeline
        .generate(&request("abc123XYZ0", false))
        .await
        .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    match err {
        TranscriptError::FetchExhausted { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_captions_disabled_fails_without_retry() {
    let (source, calls) = ScriptedSource::new(SourceBehavior::NoCaptions);
    let pipeline = pipeline_with(source);

    let err = pipeline
        .generate(&request("abc123XYZ0", false))
        .await
        .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(err, TranscriptError::NoCaptionsAvailable(_)));
}

#[tokio::test]
async fn test_model_outage_degrades_to_raw_transcript() {
    let (source, _) = ScriptedSource::new(SourceBehavior::Working(sample_fragments()));
    let pipeline = pipeline_with(source).with_model(Box::new(DownModel));

    let outcome = pipeline.generate(&request("abc123XYZ0", true)).await.unwrap();

    assert_eq!(outcome.text, "hello world how are you");
    assert!(outcome.punctuation_warning.is_some());
}

#[tokio::test]
async fn test_punctuation_without_configured_model_degrades() {
    let (source, _) = ScriptedSource::new(SourceBehavior::Working(sample_fragments()));
    // Default config has no model endpoint, so no model is wired at all
    let pipeline = pipeline_with(source);

    let outcome = pipeline.generate(&request("abc123XYZ0", true)).await.unwrap();

    assert_eq!(outcome.text, "hello world how are you");
    assert!(outcome.punctuation_warning.is_some());
}

#[tokio::test]
async fn test_custom_file_name_wins_over_title() {
    let (source, _) = ScriptedSource::new(SourceBehavior::Working(sample_fragments()));
    let pipeline = pipeline_with(source);

    let mut req = request("abc123XYZ0", false);
    req.file_name = Some("my notes".to_string());

    let outcome = pipeline.generate(&req).await.unwrap();
    assert_eq!(outcome.artifact.file_name(), "my notes.md");
}

#[tokio::test]
async fn test_invalid_reference_fails_before_fetching() {
    let (source, calls) = ScriptedSource::new(SourceBehavior::Working(sample_fragments()));
    let pipeline = pipeline_with(source);

    let err = pipeline
        .generate(&request("not a video", false))
        .await
        .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(matches!(err, TranscriptError::InvalidReference(_)));
}

#[tokio::test]
async fn test_empty_caption_track_yields_empty_artifact() {
    let (source, _) = ScriptedSource::new(SourceBehavior::Working(Vec::new()));
    let (model, model_calls) = FixedModel::new("should not be called");
    let pipeline = pipeline_with(source).with_model(Box::new(model));

    let outcome = pipeline.generate(&request("abc123XYZ0", true)).await.unwrap();

    assert_eq!(outcome.text, "");
    assert_eq!(outcome.artifact.read_text().unwrap(), "");
    // Empty input never reaches the model
    assert_eq!(model_calls.load(Ordering::SeqCst), 0);
}
