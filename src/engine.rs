//! Top-level windowed selection: windowing followed by the select-reduce fold

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::SelectError;
use crate::reduce::select_reduce;
use crate::selection::Select;
use crate::types::Passage;
use crate::windowing::window;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Select the passages of `passages` relevant to `question`.
///
/// `n` bounds each window and `step` is the offset between window starts:
/// `step == n` partitions the document, `step < n` overlaps windows, and
/// `step > n` leaves passages unscored.
pub async fn windowed_select(
    question: &str,
    passages: &[Passage],
    n: usize,
    step: usize,
    selector: &dyn Select,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<Passage>, SelectError> {
    let windows = window(passages, n, step)?;
    select_reduce(question, &windows, selector, sink).await
}

/// Selection engine shared across requests (thread-safe via Arc)
pub struct SelectionEngine {
    selector: Arc<dyn Select>,
    sink: Arc<dyn DiagnosticSink>,
    deadline: Option<Duration>,
}

pub type SharedSelectionEngine = Arc<SelectionEngine>;

impl SelectionEngine {
    pub fn new(selector: Arc<dyn Select>) -> Self {
        Self {
            selector,
            sink: Arc::new(TracingSink),
            deadline: None,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Abort any invocation that runs longer than `deadline`
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Main entry point: windowed selection under the configured deadline
    pub async fn windowed_select(
        &self,
        question: &str,
        passages: &[Passage],
        n: usize,
        step: usize,
    ) -> Result<Vec<Passage>, SelectError> {
        let start = Instant::now();
        info!(
            "Selecting with {}: {} passages, n={}, step={}",
            self.selector.name(),
            passages.len(),
            n,
            step
        );

        let run = windowed_select(
            question,
            passages,
            n,
            step,
            self.selector.as_ref(),
            self.sink.as_ref(),
        );
        let selected = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, run)
                .await
                .map_err(|_| SelectError::DeadlineExceeded(deadline))??,
            None => run.await?,
        };

        info!(
            "Selection complete: {}/{} passages in {}ms",
            selected.len(),
            passages.len(),
            start.elapsed().as_millis()
        );
        Ok(selected)
    }
}
