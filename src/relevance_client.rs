/// HTTP client for the relevance-scoring service
use crate::config::{RelevanceConfig, RetryPolicy};
use crate::error::RelevanceError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct RelevanceClient {
    url: String,
    api_key: Option<String>,
    retry: RetryPolicy,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct RelevanceRequest<'a> {
    query: &'a str,
    documents: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct RelevanceResult {
    pub score: f64,
}

#[derive(Debug, Deserialize)]
pub struct RelevanceResponse {
    pub results: Vec<RelevanceResult>,
}

impl RelevanceClient {
    /// Create a new relevance client for `config.engine` under `config.base_url`
    pub fn new(config: RelevanceConfig) -> Self {
        let url = format!(
            "{}/{}",
            config.base_url.trim_end_matches('/'),
            urlencoding::encode(&config.engine)
        );
        Self {
            url,
            api_key: config.api_key,
            retry: config.retry,
            client: reqwest::Client::new(),
        }
    }

    /// Score how relevant `context` is to `question`, retrying transient failures
    pub async fn relevance(&self, question: &str, context: &str) -> Result<f64, RelevanceError> {
        let api_key = self.api_key.as_deref().ok_or(RelevanceError::MissingApiKey)?;
        if self.retry.max_attempts == 0 {
            return Err(RelevanceError::NoAttempts);
        }

        let mut attempt = 0;
        loop {
            match self.score_once(api_key, question, context).await {
                Ok(score) => return Ok(score),
                Err(e) if e.is_transient() && attempt + 1 < self.retry.max_attempts => {
                    let delay = self.retry.jittered_delay(attempt);
                    warn!(
                        "Relevance attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt + 1,
                        self.retry.max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn score_once(
        &self,
        api_key: &str,
        question: &str,
        context: &str,
    ) -> Result<f64, RelevanceError> {
        debug!("Requesting relevance from {}", self.url);

        let body = RelevanceRequest {
            query: question,
            documents: vec![context],
        };
        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RelevanceError::Status { status, body });
        }

        let parsed: RelevanceResponse = response
            .json()
            .await
            .map_err(|e| RelevanceError::MalformedResponse(e.to_string()))?;

        parsed
            .results
            .first()
            .map(|r| r.score)
            .ok_or_else(|| RelevanceError::MalformedResponse("empty results".to_string()))
    }
}
