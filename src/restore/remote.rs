use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ModelError, PunctuationModel};
use crate::Result;

#[derive(Debug, Serialize)]
struct RestoreRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct RestoreResponse {
    text: String,
}

/// Client for an HTTP punctuation-restoration endpoint.
///
/// The endpoint receives `{"text": "..."}` and answers `{"text": "..."}` with
/// punctuation marks inserted. Anything that keeps the model from answering
/// (connect failure, non-success status, undecodable body) surfaces as a
/// `ModelError` and leaves the pipeline to fall back to unpunctuated text.
pub struct RemotePunctuationModel {
    http: Client,
    endpoint: String,
    api_token: Option<String>,
    max_chunk_chars: usize,
}

impl RemotePunctuationModel {
    pub fn new(
        endpoint: impl Into<String>,
        api_token: Option<String>,
        max_chunk_chars: usize,
        request_timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder().timeout(request_timeout).build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_token,
            max_chunk_chars: max_chunk_chars.max(1),
        })
    }
}

#[async_trait]
impl PunctuationModel for RemotePunctuationModel {
    async fn restore(&self, text: &str) -> std::result::Result<String, ModelError> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .json(&RestoreRequest { text });

        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ModelError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ModelError::RequestFailed(format!(
                "model endpoint returned HTTP {}",
                status
            )));
        }

        let body: RestoreResponse = response
            .json()
            .await
            .map_err(|e| ModelError::BadResponse(e.to_string()))?;

        Ok(body.text)
    }

    fn max_input_chars(&self) -> Option<usize> {
        Some(self.max_chunk_chars)
    }
}
