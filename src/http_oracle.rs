//! HTTP oracle backed by an OpenAI-compatible completions endpoint

use crate::config::OracleConfig;
use crate::error::OracleError;
use crate::oracle::ScoringOracle;
use crate::types::{CompletionRequest, ScoreResponse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request body for the completions endpoint
#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: usize,
    logprobs: usize,
    echo: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    logprobs: Option<ScoreResponse>,
}

pub struct HttpOracle {
    config: OracleConfig,
    client: reqwest::Client,
}

impl HttpOracle {
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// Rough token count: four characters per token
    fn estimate_tokens(prompt: &str) -> usize {
        (prompt.chars().count() + 3) / 4
    }

    fn is_context_overflow(status: reqwest::StatusCode, body: &str) -> bool {
        status == reqwest::StatusCode::BAD_REQUEST
            && (body.contains("context_length_exceeded") || body.contains("maximum context length"))
    }
}

#[async_trait]
impl ScoringOracle for HttpOracle {
    fn name(&self) -> &'static str {
        "http_completions"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<ScoreResponse, OracleError> {
        let estimated_tokens = Self::estimate_tokens(&request.prompt);
        if estimated_tokens > self.config.max_context_tokens {
            return Err(OracleError::PromptTooLong {
                estimated_tokens,
                limit: self.config.max_context_tokens,
            });
        }

        let body = CompletionBody {
            model: &self.config.model,
            prompt: &request.prompt,
            max_tokens: request.max_tokens,
            logprobs: request.top_logprobs,
            echo: request.echo,
        };

        let url = format!("{}/completions", self.config.base_url.trim_end_matches('/'));
        let mut builder = self.client.post(&url).json(&body);
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        tracing::debug!("Scoring prompt (~{} tokens) at {}", estimated_tokens, url);
        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            if Self::is_context_overflow(status, &error_text) {
                return Err(OracleError::PromptTooLong {
                    estimated_tokens,
                    limit: self.config.max_context_tokens,
                });
            }
            return Err(OracleError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| OracleError::MalformedResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.logprobs)
            .ok_or_else(|| OracleError::MalformedResponse("response has no logprobs".to_string()))
    }
}
