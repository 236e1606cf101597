use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ProblemId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("too many answers for a single session: {len}")]
    TooManyAnswers { len: usize },

    #[error("answered ({answered}) exceeds the number of problems ({total})")]
    AnsweredExceedsTotal { total: u32, answered: u32 },

    #[error("correct answers ({correct}) exceed answered problems ({answered})")]
    CorrectExceedsAnswered { answered: u32, correct: u32 },
}

/// One answer given during a practice session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub problem_id: ProblemId,
    pub selected: usize,
    pub correct: bool,
    pub answered_at: DateTime<Utc>,
}

impl AnswerRecord {
    #[must_use]
    pub fn new(
        problem_id: ProblemId,
        selected: usize,
        correct: bool,
        answered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            problem_id,
            selected,
            correct,
            answered_at,
        }
    }
}

/// Aggregate result of a finished practice session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    total: u32,
    answered: u32,
    correct: u32,
}

impl SessionSummary {
    /// Build a summary from raw counts.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError` if the time range is inverted or the
    /// counts are inconsistent.
    pub fn new(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        total: u32,
        answered: u32,
        correct: u32,
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        if answered > total {
            return Err(SessionSummaryError::AnsweredExceedsTotal { total, answered });
        }
        if correct > answered {
            return Err(SessionSummaryError::CorrectExceedsAnswered { answered, correct });
        }

        Ok(Self {
            started_at,
            completed_at,
            total,
            answered,
            correct,
        })
    }

    /// Build a summary from the answers recorded during a session.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::TooManyAnswers` if the record count does not fit in `u32`,
    /// plus any error from [`SessionSummary::new`].
    pub fn from_records(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        total: usize,
        records: &[AnswerRecord],
    ) -> Result<Self, SessionSummaryError> {
        let to_u32 = |len: usize| {
            u32::try_from(len).map_err(|_| SessionSummaryError::TooManyAnswers { len })
        };

        let correct = records.iter().filter(|record| record.correct).count();
        Self::new(
            started_at,
            completed_at,
            to_u32(total)?,
            to_u32(records.len())?,
            to_u32(correct)?,
        )
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.answered - self.correct
    }

    /// Share of all problems answered correctly, in `[0, 1]`.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.correct) / f64::from(self.total)
    }
}
