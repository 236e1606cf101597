use thiserror::Error;

use crate::model::{BankError, StepProblemError};

/// Any model validation failure.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    StepProblem(#[from] StepProblemError),
}
