//! Pluggable selection strategies and the logprob-comparison selector

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::SelectError;
use crate::logprobs::{baseline_logprob, decide, extract_candidate_logprobs};
use crate::oracle::ScoringOracle;
use crate::prompt::build_selection_prompt;
use crate::types::{CompletionRequest, Passage};
use async_trait::async_trait;

/// Number of alternatives the oracle actually reports per position
pub const ORACLE_TOP_K: usize = 5;

/// Strategy picking newly relevant passages given those already accepted
#[async_trait]
pub trait Select: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the selected subset of `candidates`, in their original order.
    ///
    /// Non-fatal conditions are reported to `sink`, the invocation's sink.
    async fn select(
        &self,
        question: &str,
        candidates: &[Passage],
        existing: &[Passage],
        sink: &dyn DiagnosticSink,
    ) -> Result<Vec<Passage>, SelectError>;
}

/// Selects candidates whose label the oracle prefers over "none"
pub struct LogprobSelector<O> {
    oracle: O,
    top_logprobs: usize,
}

impl<O: ScoringOracle> LogprobSelector<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            top_logprobs: 100,
        }
    }

    pub fn with_top_logprobs(mut self, top_logprobs: usize) -> Self {
        self.top_logprobs = top_logprobs;
        self
    }
}

#[async_trait]
impl<O: ScoringOracle> Select for LogprobSelector<O> {
    fn name(&self) -> &'static str {
        "logprob"
    }

    async fn select(
        &self,
        question: &str,
        candidates: &[Passage],
        existing: &[Passage],
        sink: &dyn DiagnosticSink,
    ) -> Result<Vec<Passage>, SelectError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        if candidates.len() > ORACLE_TOP_K {
            sink.emit(Diagnostic::DegradedCandidateCount {
                candidates: candidates.len(),
                top_k: ORACLE_TOP_K,
            });
        }

        let prompt = build_selection_prompt(question, existing, candidates);
        let request = CompletionRequest::echo_only(prompt, self.top_logprobs.max(candidates.len()));
        let response = self.oracle.complete(&request).await?;

        let choice_logprobs = extract_candidate_logprobs(&response, candidates.len())?;
        let baseline = baseline_logprob(&response)?;
        let selected = decide(&choice_logprobs, baseline, candidates);

        tracing::debug!(
            "{} selected {}/{} candidates (baseline {:?} at {:.3})",
            self.oracle.name(),
            selected.len(),
            candidates.len(),
            response.tokens.last().map(String::as_str).unwrap_or_default(),
            baseline
        );
        Ok(selected)
    }
}
