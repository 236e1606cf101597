mod session;

pub use crate::error::SolverError;
pub use session::SolverSession;
