//! Core type definitions for windowed passage selection

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A passage of the source document, identified only by its position
pub type Passage = String;

/// Contiguous slice of passages scored together in one oracle call
pub type Window = Vec<Passage>;

/// Request sent to the scoring oracle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: usize,    // always 0: we only read echoed logprobs
    pub top_logprobs: usize,  // alternatives requested per position
    pub echo: bool,
}

impl CompletionRequest {
    /// Request that scores the final token of `prompt` without generating anything
    pub fn echo_only(prompt: String, top_logprobs: usize) -> Self {
        Self {
            prompt,
            max_tokens: 0,
            top_logprobs,
            echo: true,
        }
    }
}

/// Raw per-token logprob output for one prompt
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScoreResponse {
    #[serde(default)]
    pub tokens: Vec<String>,
    /// Logprob of each token actually present; the first echoed token has none
    pub token_logprobs: Vec<Option<f64>>,
    /// Top-K alternatives per position
    pub top_logprobs: Vec<Option<HashMap<String, f64>>>,
}

impl ScoreResponse {
    /// Build a response describing only the final position
    pub fn final_position(token: &str, logprob: f64, alternatives: HashMap<String, f64>) -> Self {
        Self {
            tokens: vec![token.to_string()],
            token_logprobs: vec![Some(logprob)],
            top_logprobs: vec![Some(alternatives)],
        }
    }
}
