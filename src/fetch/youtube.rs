use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::{CaptionFragment, CaptionSource, FetchError, FetchedTranscript, VideoId, VideoInfo};
use crate::{Result, TranscriptError};

const PLAYER_ENDPOINT: &str = "https://www.youtube.com/youtubei/v1/player";

// Android client context; the web client gates caption tracks behind
// signature-protected URLs, the Android one does not.
const CLIENT_NAME: &str = "ANDROID";
const CLIENT_VERSION: &str = "20.10.38";
const USER_AGENT: &str = "com.google.android.youtube/20.10.38 (Linux; U; Android 11)";

/// Caption fetcher backed by the public player API
pub struct YoutubeCaptionClient {
    http: Client,
}

/// One entry of the player response's caption track list
#[derive(Debug, Clone, Deserialize)]
pub struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    pub base_url: String,

    #[serde(rename = "languageCode")]
    pub language_code: String,

    /// "asr" for auto-generated tracks, absent for manual ones
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

#[derive(Debug, Deserialize)]
struct Json3Track {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(rename = "tStartMs", default)]
    start_ms: u64,

    #[serde(rename = "dDurationMs", default)]
    duration_ms: u64,

    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

impl YoutubeCaptionClient {
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http })
    }

    /// Call the player endpoint and return the raw response document
    async fn player_response(&self, video: &VideoId) -> std::result::Result<Value, FetchError> {
        let body = json!({
            "context": {
                "client": {
                    "clientName": CLIENT_NAME,
                    "clientVersion": CLIENT_VERSION,
                    "androidSdkVersion": 30,
                }
            },
            "videoId": video.as_str(),
        });

        tracing::debug!("Requesting player data for video {}", video);

        let response = self
            .http
            .post(PLAYER_ENDPOINT)
            .query(&[("prettyPrint", "false")])
            .json(&body)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_http_status(status.as_u16(), video));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Transient(format!("malformed player response: {}", e)))
    }

    /// Download a caption track in json3 format and decode its events
    async fn download_track(
        &self,
        track: &CaptionTrack,
    ) -> std::result::Result<Vec<CaptionFragment>, FetchError> {
        let mut url = url::Url::parse(&track.base_url)
            .map_err(|e| FetchError::Transient(format!("bad caption track url: {}", e)))?;
        url.query_pairs_mut().append_pair("fmt", "json3");

        tracing::debug!("Downloading caption track: {}", track.language_code);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Transient(format!(
                "caption track download returned HTTP {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transient(format!("caption track read failed: {}", e)))?;

        decode_json3(&body)
    }
}

#[async_trait]
impl CaptionSource for YoutubeCaptionClient {
    async fn fetch(
        &self,
        video: &VideoId,
        language: &str,
    ) -> std::result::Result<FetchedTranscript, FetchError> {
        let player = self.player_response(video).await?;

        check_playability(&player, video)?;

        let info = video_info(&player, video);
        let tracks = caption_tracks(&player);

        let track = select_track(&tracks, language).ok_or_else(|| {
            FetchError::Fatal(TranscriptError::NoCaptionsAvailable(
                video.as_str().to_string(),
            ))
        })?;

        let fragments = self.download_track(track).await?;

        tracing::info!(
            "Fetched {} caption fragments for video {} ({})",
            fragments.len(),
            video,
            track.language_code
        );

        Ok(FetchedTranscript {
            video: info,
            fragments,
        })
    }
}

/// Map a reqwest transport error onto the retry classification.
///
/// Everything at this level (DNS, connect, timeout, broken transfer) is
/// transient; permanent conditions only become visible in the response body.
fn classify_request_error(error: reqwest::Error) -> FetchError {
    FetchError::Transient(format!("caption service request failed: {}", error))
}

/// Map an HTTP status onto the retry classification.
fn classify_http_status(status: u16, video: &VideoId) -> FetchError {
    match status {
        429 | 500..=599 => {
            FetchError::Transient(format!("caption service returned HTTP {}", status))
        }
        _ => FetchError::Fatal(TranscriptError::VideoUnavailable {
            id: video.as_str().to_string(),
            reason: format!("caption service returned HTTP {}", status),
        }),
    }
}

/// Reject videos the service reports as unplayable before looking for tracks
fn check_playability(player: &Value, video: &VideoId) -> std::result::Result<(), FetchError> {
    let status = player["playabilityStatus"]["status"]
        .as_str()
        .unwrap_or("ERROR");

    if status == "OK" {
        return Ok(());
    }

    let reason = player["playabilityStatus"]["reason"]
        .as_str()
        .unwrap_or(status)
        .to_string();

    Err(FetchError::Fatal(TranscriptError::VideoUnavailable {
        id: video.as_str().to_string(),
        reason,
    }))
}

fn video_info(player: &Value, video: &VideoId) -> VideoInfo {
    let details = &player["videoDetails"];

    VideoInfo {
        id: video.as_str().to_string(),
        title: details["title"].as_str().map(|s| s.to_string()),
        author: details["author"].as_str().map(|s| s.to_string()),
        length_seconds: details["lengthSeconds"]
            .as_str()
            .and_then(|s| s.parse().ok()),
    }
}

fn caption_tracks(player: &Value) -> Vec<CaptionTrack> {
    player["captions"]["playerCaptionsTracklistRenderer"]["captionTracks"]
        .as_array()
        .map(|tracks| {
            tracks
                .iter()
                .filter_map(|t| serde_json::from_value(t.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Pick the caption track for a requested language.
///
/// Exact language-code matches win, then primary-subtag matches ("en" vs
/// "en-US" in either direction); manual tracks beat auto-generated ones
/// within each tier.
fn select_track<'a>(tracks: &'a [CaptionTrack], language: &str) -> Option<&'a CaptionTrack> {
    let primary = |code: &str| code.split('-').next().unwrap_or(code).to_ascii_lowercase();

    let exact = |t: &&CaptionTrack| t.language_code.eq_ignore_ascii_case(language);
    let related = |t: &&CaptionTrack| primary(&t.language_code) == primary(language);

    tracks
        .iter()
        .find(|t| exact(t) && !t.is_generated())
        .or_else(|| tracks.iter().find(exact))
        .or_else(|| tracks.iter().find(|t| related(t) && !t.is_generated()))
        .or_else(|| tracks.iter().find(related))
}

/// Decode a json3 caption document into ordered fragments
fn decode_json3(body: &str) -> std::result::Result<Vec<CaptionFragment>, FetchError> {
    let track: Json3Track = serde_json::from_str(body)
        .map_err(|e| FetchError::Transient(format!("malformed caption track: {}", e)))?;

    let fragments = track
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|seg| seg.utf8.as_str()).collect();
            if text.trim().is_empty() {
                return None;
            }

            Some(CaptionFragment::new(
                text,
                event.start_ms as f64 / 1000.0,
                event.duration_ms as f64 / 1000.0,
            ))
        })
        .collect();

    Ok(fragments)
}
