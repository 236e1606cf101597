mod bank;
mod ids;
mod problem;
mod session;
mod step;

pub use ids::{ParseIdError, ProblemId, SessionId, StepProblemId};

pub use bank::{BankError, ProblemBank};
pub use problem::{MIN_OPTIONS, Problem, ProblemDraft, ProblemError};
pub use session::{AnswerRecord, SessionSummary, SessionSummaryError};
pub use step::{StepProblem, StepProblemDraft, StepProblemError};
