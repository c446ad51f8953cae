//! Error taxonomy for oracle calls, selection runs and the relevance agent

use std::time::Duration;
use thiserror::Error;

/// Failures raised by a scoring oracle
#[derive(Debug, Error)]
pub enum OracleError {
    /// Prompt does not fit the oracle's context window; raised before any response
    #[error("prompt of ~{estimated_tokens} tokens exceeds the oracle context limit of {limit}")]
    PromptTooLong { estimated_tokens: usize, limit: usize },

    #[error("oracle request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("oracle returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed oracle response: {0}")]
    MalformedResponse(String),
}

impl OracleError {
    pub fn is_prompt_too_long(&self) -> bool {
        matches!(self, OracleError::PromptTooLong { .. })
    }
}

/// Failures of a selection run
#[derive(Debug, Error)]
pub enum SelectError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("invalid window parameters: n={n}, step={step} (both must be at least 1)")]
    InvalidWindow { n: usize, step: usize },

    #[error("selection aborted after exceeding its {0:?} deadline")]
    DeadlineExceeded(Duration),
}

impl SelectError {
    /// True when the oracle rejected the prompt for its size
    pub fn is_prompt_too_long(&self) -> bool {
        matches!(self, SelectError::Oracle(e) if e.is_prompt_too_long())
    }
}

/// Failures of the relevance-scoring agent
#[derive(Debug, Error)]
pub enum RelevanceError {
    #[error("relevance API key not set")]
    MissingApiKey,

    #[error("relevance retry policy allows no attempts")]
    NoAttempts,

    #[error("relevance request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("relevance service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed relevance response: {0}")]
    MalformedResponse(String),
}

impl RelevanceError {
    /// Whether another attempt might succeed
    pub fn is_transient(&self) -> bool {
        match self {
            RelevanceError::Request(e) => !e.is_builder() && !e.is_decode(),
            RelevanceError::Status { status, .. } => *status == 429 || *status >= 500,
            RelevanceError::MissingApiKey
            | RelevanceError::NoAttempts
            | RelevanceError::MalformedResponse(_) => false,
        }
    }
}
