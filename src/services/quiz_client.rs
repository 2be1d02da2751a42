// src/services/quiz_client.rs
use reqwest::{
    Client, StatusCode,
    header::{CACHE_CONTROL, PRAGMA},
};
use url::Url;

use crate::message::QuizResponse;

#[derive(Debug, thiserror::Error)]
pub enum QuizClientError {
    #[error("Failed to build quiz url: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to reach quiz backend: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to fetch quiz: {}", .0.as_u16())]
    Status(StatusCode),

    #[error("Failed to decode quiz: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Typed client for the quiz backend's `GET /quiz`.
#[derive(Debug, Clone)]
pub struct QuizClient {
    http: Client,
    base_url: Url,
}

impl QuizClient {
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        let http = Client::builder().build()?;
        Ok(Self { http, base_url })
    }

    /// `{base_url}/quiz`, with `exclude=<ids joined by ",">` when `exclude_ids` is non-empty.
    pub fn quiz_url(&self, exclude_ids: &[String]) -> Result<Url, QuizClientError> {
        let mut url = Url::parse(&format!(
            "{}/quiz",
            self.base_url.as_str().trim_end_matches('/')
        ))?;
        if !exclude_ids.is_empty() {
            url.query_pairs_mut()
                .append_pair("exclude", &exclude_ids.join(","));
        }
        Ok(url)
    }

    pub async fn fetch_quiz(&self, exclude_ids: &[String]) -> Result<QuizResponse, QuizClientError> {
        let url = self.quiz_url(exclude_ids)?;
        tracing::debug!(%url, excluded = exclude_ids.len(), "fetching quiz");

        let res = self
            .http
            .get(url)
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(QuizClientError::Status(status));
        }

        let body = res.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
