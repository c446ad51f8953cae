//! Injected sink for diagnostic events raised during selection

use std::sync::Mutex;

/// Non-fatal conditions worth surfacing to the caller
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// More candidates than the oracle's top-K can tell apart
    DegradedCandidateCount { candidates: usize, top_k: usize },
    /// A window was dropped and the accumulator left unchanged
    WindowSkipped {
        window: usize,
        candidates: usize,
        reason: String,
    },
}

pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, event: Diagnostic);
}

/// Default sink: forwards every event as a structured warning
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, event: Diagnostic) {
        match event {
            Diagnostic::DegradedCandidateCount { candidates, top_k } => {
                tracing::warn!(
                    num_candidates = candidates,
                    top_k,
                    "oracle only reports the top {} logprobs; \
                     not all candidates can be fully considered",
                    top_k
                );
            }
            Diagnostic::WindowSkipped { window, candidates, reason } => {
                tracing::warn!(window, num_candidates = candidates, %reason, "skipping window");
            }
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn skipped_windows(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Diagnostic::WindowSkipped { window, .. } => Some(window),
                _ => None,
            })
            .collect()
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, event: Diagnostic) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.emit(Diagnostic::DegradedCandidateCount { candidates: 6, top_k: 5 });
        sink.emit(Diagnostic::WindowSkipped {
            window: 3,
            candidates: 2,
            reason: "too long".to_string(),
        });

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Diagnostic::DegradedCandidateCount { candidates: 6, .. }));
        assert_eq!(sink.skipped_windows(), vec![3]);
    }
}
