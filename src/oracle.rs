//! Scoring oracle interface

use crate::error::OracleError;
use crate::types::{CompletionRequest, ScoreResponse};
use async_trait::async_trait;

/// Completion service queried for next-token logprobs.
///
/// Implementations must raise `OracleError::PromptTooLong` when the prompt
/// does not fit their context window.
#[async_trait]
pub trait ScoringOracle: Send + Sync {
    fn name(&self) -> &'static str;

    async fn complete(&self, request: &CompletionRequest) -> Result<ScoreResponse, OracleError>;
}
