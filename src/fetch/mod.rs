use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

pub mod retry;
pub mod youtube;

use crate::TranscriptError;

/// One timed unit of raw caption text, in temporal order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionFragment {
    /// Raw fragment text as emitted by the caption track
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

impl CaptionFragment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// Metadata about the video the captions belong to
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Video identifier
    pub id: String,

    /// Video title if the service reported one
    pub title: Option<String>,

    /// Channel or uploader name
    pub author: Option<String>,

    /// Total video length in seconds
    pub length_seconds: Option<u64>,
}

/// A complete caption track plus the video it came from
#[derive(Debug, Clone)]
pub struct FetchedTranscript {
    pub video: VideoInfo,
    pub fragments: Vec<CaptionFragment>,
}

/// Failures reported by a caption source, split by retry eligibility.
///
/// Only `Transient` failures are retried; everything carrying a
/// `TranscriptError` is permanent and aborts the fetch immediately.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Fatal(#[from] TranscriptError),

    #[error("Transient fetch failure: {0}")]
    Transient(String),
}

/// Trait for services that can produce a caption track for a video
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Fetch the ordered caption track for a video in the given language
    async fn fetch(&self, video: &VideoId, language: &str) -> Result<FetchedTranscript, FetchError>;
}

/// A validated video identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoId(String);

impl VideoId {
    /// Parse a user-supplied reference: either a bare video id or a
    /// recognized watch-page URL.
    pub fn parse(reference: &str) -> Result<Self, TranscriptError> {
        let trimmed = reference.trim();

        if trimmed.is_empty() {
            return Err(TranscriptError::InvalidReference(
                "empty reference".to_string(),
            ));
        }

        if is_id_token(trimmed) {
            return Ok(Self(trimmed.to_string()));
        }

        let candidate = extract_from_url(trimmed)
            .ok_or_else(|| TranscriptError::InvalidReference(trimmed.to_string()))?;

        if is_id_token(&candidate) {
            Ok(Self(candidate))
        } else {
            Err(TranscriptError::InvalidReference(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check whether a bare token looks like a video id.
///
/// Canonical ids are 11 characters, but the service has used other lengths
/// historically, so anything in the id alphabet between 8 and 16 characters
/// is accepted.
fn is_id_token(token: &str) -> bool {
    (8..=16).contains(&token.len())
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Pull a video id out of a watch-page URL, if the URL is a recognized form.
fn extract_from_url(reference: &str) -> Option<String> {
    let url = Url::parse(reference).ok()?;

    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let host = url.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);

    match host {
        "youtu.be" => url
            .path_segments()?
            .next()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string()),
        "youtube.com" | "m.youtube.com" | "music.youtube.com" => {
            if url.path() == "/watch" {
                return url
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned());
            }

            let mut segments = url.path_segments()?;
            match segments.next() {
                Some("embed") | Some("shorts") | Some("v") | Some("live") => segments
                    .next()
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_string()),
                _ => None,
            }
        }
        _ => None,
    }
}
