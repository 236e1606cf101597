use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ProblemId;

/// Minimum number of answer choices a problem must offer.
pub const MIN_OPTIONS: usize = 2;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProblemError {
    #[error("question text cannot be empty")]
    EmptyQuestion,

    #[error("a problem needs at least 2 options, got {len}")]
    TooFewOptions { len: usize },

    #[error("option {index} is empty")]
    EmptyOption { index: usize },

    #[error("correct index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },

    #[error("explanation text cannot be empty")]
    EmptyExplanation,
}

//
// ─── PROBLEM TYPES ─────────────────────────────────────────────────────────────
//

/// Unvalidated problem as it arrives from a bank file or a fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDraft {
    pub id: ProblemId,
    pub question: String,
    pub options: Vec<String>,
    #[serde(alias = "correct_index")]
    pub correct: usize,
    #[serde(default)]
    pub hint: Option<String>,
    pub explanation: String,
}

impl ProblemDraft {
    /// Validate the draft into an immutable `Problem`.
    ///
    /// Question, options and explanation are trimmed. A blank hint is dropped.
    ///
    /// # Errors
    ///
    /// Returns `ProblemError` if the question or explanation is blank, fewer than
    /// two options are given, an option is blank, or `correct` does not index
    /// into `options`.
    pub fn validate(self) -> Result<Problem, ProblemError> {
        let question = self.question.trim();
        if question.is_empty() {
            return Err(ProblemError::EmptyQuestion);
        }

        if self.options.len() < MIN_OPTIONS {
            return Err(ProblemError::TooFewOptions {
                len: self.options.len(),
            });
        }

        let mut options = Vec::with_capacity(self.options.len());
        for (index, option) in self.options.iter().enumerate() {
            let trimmed = option.trim();
            if trimmed.is_empty() {
                return Err(ProblemError::EmptyOption { index });
            }
            options.push(trimmed.to_string());
        }

        if self.correct >= options.len() {
            return Err(ProblemError::CorrectIndexOutOfRange {
                index: self.correct,
                len: options.len(),
            });
        }

        let explanation = self.explanation.trim();
        if explanation.is_empty() {
            return Err(ProblemError::EmptyExplanation);
        }

        let hint = self
            .hint
            .map(|hint| hint.trim().to_string())
            .filter(|hint| !hint.is_empty());

        Ok(Problem {
            id: self.id,
            question: question.to_string(),
            options,
            correct_index: self.correct,
            hint,
            explanation: explanation.to_string(),
        })
    }
}

/// A validated multiple-choice problem.
///
/// Fields are private so that `correct_index < options.len()` holds for every
/// value of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    id: ProblemId,
    question: String,
    options: Vec<String>,
    correct_index: usize,
    hint: Option<String>,
    explanation: String,
}

impl Problem {
    #[must_use]
    pub fn id(&self) -> ProblemId {
        self.id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Returns true when `index` is the correct option.
    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
