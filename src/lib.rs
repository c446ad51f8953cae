//! passage-select - question-driven passage selection over long documents
//!
//! Selects the passages of a document relevant to a question by asking a
//! language-model oracle, window by window, which candidate it would pick
//! next:
//! - Bounded, optionally overlapping windows over the passage sequence
//! - Per-candidate logprobs compared against the "none" baseline
//! - Sequential fold where each window sees everything accepted so far
//! - Oversized windows skipped with a diagnostic instead of aborting

pub mod types;
pub mod error;
pub mod config;
pub mod diagnostics;
pub mod windowing;
pub mod prompt;
pub mod logprobs;
pub mod oracle;
pub mod http_oracle;
pub mod selection;
pub mod reduce;
pub mod engine;
pub mod relevance_client;
pub mod server;

pub use types::*;
pub use error::{OracleError, RelevanceError, SelectError};
pub use diagnostics::{Diagnostic, DiagnosticSink, RecordingSink, TracingSink};
pub use engine::{windowed_select, SelectionEngine, SharedSelectionEngine};
pub use http_oracle::HttpOracle;
pub use oracle::ScoringOracle;
pub use reduce::{fold_windows, select_reduce, FoldStep, Step};
pub use relevance_client::RelevanceClient;
pub use selection::{LogprobSelector, Select, ORACLE_TOP_K};
pub use windowing::window;
