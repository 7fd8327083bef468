//! HTTP client for the text-generation service.
//!
//! Speaks the `generateContent` wire shape: a prompt goes out as a single
//! user content part and the first candidate's parts come back concatenated.
//! The client knows nothing about analysis semantics; parsing the completion
//! into a narrative happens in the tier chain.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::GenAiError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the text-generation REST API.
pub struct GenAiClient {
    client: Client,
    api_key: String,
    base_url: Url,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenAiClient {
    /// Creates a new client pointed at the production generation API.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, GenAiError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GenAiError::Api`] if `base_url` is not a
    /// valid URL.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GenAiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("siteline/0.1 (location-intelligence)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| GenAiError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            model: model.to_owned(),
        })
    }

    /// Sends a prompt and returns the completion text of the first candidate.
    ///
    /// # Errors
    ///
    /// - [`GenAiError::Http`] on network failure or a non-2xx HTTP status.
    /// - [`GenAiError::Api`] if the response body cannot be parsed.
    /// - [`GenAiError::EmptyCompletion`] if no candidate carries text.
    pub async fn generate(&self, prompt: &str) -> Result<String, GenAiError> {
        let path = format!("models/{}:generateContent", self.model);
        let mut url = self
            .base_url
            .join(&path)
            .map_err(|e| GenAiError::Api(format!("invalid model path '{path}': {e}")))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self.client.post(url).json(&request).send().await?;
        let response = response.error_for_status()?;

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenAiError::Api(format!("response parse error: {e}")))?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenAiError::EmptyCompletion);
        }
        Ok(text)
    }
}
