//! Error types for scorefold.

use crate::report::ReportState;
use thiserror::Error;

/// Errors from loading logs, loading configuration and driving a report.
///
/// Folding and validation never produce these: a bad log folds into a
/// result that fails validation instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading an event log failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A line of a JSON-lines event log did not decode.
    #[error("line {line}: invalid event: {source}")]
    Decode {
        /// 1-based line number.
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A ruleset was rejected.
    #[error("invalid ruleset: {0}")]
    Config(String),

    /// The report state machine was asked to make an illegal move.
    #[error("illegal report transition {from:?} -> {to:?}")]
    Transition { from: ReportState, to: ReportState },

    /// The upstream sink failed.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// The event source could not deliver the log.
    #[error("event source: {0}")]
    Source(String),

    /// The caller's credential could not be resolved.
    #[error("identity: {0}")]
    Identity(String),
}

/// Failures reported by a [`ReportSink`](crate::ReportSink).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// Upstream already holds a result for this match. Not retriable.
    #[error("match result already registered")]
    AlreadyReported,

    /// The call did not go through. The caller may retry later.
    #[error("transport error: {0}")]
    Transport(String),
}
