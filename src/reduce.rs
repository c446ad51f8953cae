//! Sequential fold over windows with an explicit skip-vs-abort contract

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::SelectError;
use crate::selection::Select;
use crate::types::{Passage, Window};
use async_trait::async_trait;

/// Outcome of one fold step
#[derive(Debug, Clone, PartialEq)]
pub enum Step<T> {
    /// Append these items to the accumulator
    Extend(Vec<T>),
    /// Leave the accumulator untouched
    Skip(String),
}

/// One step of an append-only fold over windows
#[async_trait]
pub trait FoldStep<T: Send + Sync>: Send + Sync {
    type Error: Send;

    async fn step(&self, accepted: &[T], window: &[T]) -> Result<Step<T>, Self::Error>;
}

/// Fold `windows` in order, each step seeing everything accepted so far.
///
/// A `Skip` is reported to `sink` and the fold continues; an error aborts
/// the whole fold and no partial accumulator is returned.
pub async fn fold_windows<T, S>(
    windows: &[Vec<T>],
    stepper: &S,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<T>, S::Error>
where
    T: Send + Sync,
    S: FoldStep<T> + ?Sized,
{
    let mut accepted: Vec<T> = Vec::new();
    for (idx, window) in windows.iter().enumerate() {
        match stepper.step(&accepted, window).await? {
            Step::Extend(items) => accepted.extend(items),
            Step::Skip(reason) => sink.emit(Diagnostic::WindowSkipped {
                window: idx,
                candidates: window.len(),
                reason,
            }),
        }
    }
    Ok(accepted)
}

/// Fold step that runs a selector and skips windows whose prompt is too long.
///
/// The selector reports to the same sink as the fold itself.
pub struct SelectStep<'a> {
    pub question: &'a str,
    pub selector: &'a dyn Select,
    pub sink: &'a dyn DiagnosticSink,
}

#[async_trait]
impl<'a> FoldStep<Passage> for SelectStep<'a> {
    type Error = SelectError;

    async fn step(
        &self,
        accepted: &[Passage],
        window: &[Passage],
    ) -> Result<Step<Passage>, SelectError> {
        match self.selector.select(self.question, window, accepted, self.sink).await {
            Ok(selected) => Ok(Step::Extend(selected)),
            Err(e) if e.is_prompt_too_long() => Ok(Step::Skip(format!("prompt full: {}", e))),
            Err(e) => Err(e),
        }
    }
}

/// Select passages answering `question` by folding `selector` over `windows`
pub async fn select_reduce(
    question: &str,
    windows: &[Window],
    selector: &dyn Select,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<Passage>, SelectError> {
    let stepper = SelectStep {
        question,
        selector,
        sink,
    };
    fold_windows(windows, &stepper, sink).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Accepts every window item not yet accepted; skips windows containing "skip"
    struct Dedup;

    #[async_trait]
    impl FoldStep<&'static str> for Dedup {
        type Error = String;

        async fn step(
            &self,
            accepted: &[&'static str],
            window: &[&'static str],
        ) -> Result<Step<&'static str>, String> {
            if window.contains(&"boom") {
                return Err("boom".to_string());
            }
            if window.contains(&"skip") {
                return Ok(Step::Skip("asked to".to_string()));
            }
            Ok(Step::Extend(
                window.iter().filter(|w| !accepted.contains(w)).copied().collect(),
            ))
        }
    }

    #[tokio::test]
    async fn test_fold_sees_prior_accumulator() {
        let sink = RecordingSink::new();
        let windows = vec![vec!["a", "b"], vec!["b", "c"], vec!["c", "d"]];

        let result = fold_windows(&windows, &Dedup, &sink).await.unwrap();
        assert_eq!(result, vec!["a", "b", "c", "d"]);
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn test_skip_leaves_accumulator_and_reports() {
        let sink = RecordingSink::new();
        let windows = vec![vec!["a"], vec!["skip", "x"], vec!["c"]];

        let result = fold_windows(&windows, &Dedup, &sink).await.unwrap();
        assert_eq!(result, vec!["a", "c"]);
        assert_eq!(
            sink.events(),
            vec![Diagnostic::WindowSkipped {
                window: 1,
                candidates: 2,
                reason: "asked to".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_error_aborts_fold() {
        let sink = RecordingSink::new();
        let windows = vec![vec!["a"], vec!["boom"], vec!["c"]];

        let result = fold_windows(&windows, &Dedup, &sink).await;
        assert_eq!(result, Err("boom".to_string()));
    }

    struct CountingStep(AtomicUsize);

    #[async_trait]
    impl FoldStep<u32> for CountingStep {
        type Error = ();

        async fn step(&self, _accepted: &[u32], window: &[u32]) -> Result<Step<u32>, ()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Step::Extend(window.to_vec()))
        }
    }

    #[tokio::test]
    async fn test_empty_windows_never_step() {
        let stepper = CountingStep(AtomicUsize::new(0));
        let windows: Vec<Vec<u32>> = Vec::new();
        let result = fold_windows(&windows, &stepper, &RecordingSink::new()).await.unwrap();

        assert!(result.is_empty());
        assert_eq!(stepper.0.load(Ordering::SeqCst), 0);
    }
}
