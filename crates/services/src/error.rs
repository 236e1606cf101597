//! Shared error types for the services crate.

use thiserror::Error;

use practice_core::model::{BankError, SessionSummaryError, StepProblemId};

/// Errors emitted by `SessionController`.
///
/// A rejected operation leaves the session untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no problems available for session")]
    EmptyBank,
    #[error(transparent)]
    MalformedProblem(#[from] BankError),
    #[error("answer already revealed for problem {problem_index}")]
    InvalidState { problem_index: usize },
    #[error("index {index} is out of range (len {len})")]
    OutOfRange { index: usize, len: usize },
    #[error("session is not complete")]
    Incomplete,
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}

/// Errors emitted by `SolverSession`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SolverError {
    #[error("no step problems available")]
    NoProblems,
    #[error("unknown step problem: {0}")]
    UnknownProblem(StepProblemId),
    #[error("step problem {0} appears more than once")]
    DuplicateId(StepProblemId),
}

/// Errors emitted by `BankLoader`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankLoadError {
    #[error("failed to parse problem bank: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] practice_core::Error),
}
