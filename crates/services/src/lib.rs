#![forbid(unsafe_code)]

pub mod bank_loader;
pub mod error;
pub mod sessions;
pub mod solver;

pub use practice_core::Clock;

pub use bank_loader::{BankLoader, LoadedBank};
pub use error::{BankLoadError, SessionError, SolverError};

pub use sessions::{
    OptionFeedback, OptionStatus, SessionBuilder, SessionController, SessionProgress, SessionState,
};
pub use solver::SolverSession;
