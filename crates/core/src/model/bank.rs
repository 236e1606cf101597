use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::model::ids::ProblemId;
use crate::model::problem::{Problem, ProblemDraft, ProblemError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("problem {id} appears more than once")]
    DuplicateId { id: ProblemId },

    #[error("problem {id} is malformed: {source}")]
    Malformed {
        id: ProblemId,
        #[source]
        source: ProblemError,
    },
}

/// Ordered, immutable set of problems for practice sessions.
///
/// Cloning is cheap; the problems are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemBank {
    problems: Arc<[Problem]>,
}

impl ProblemBank {
    /// Build a bank from validated problems, keeping their order.
    ///
    /// An empty bank is allowed here; sessions refuse to start on one.
    ///
    /// # Errors
    ///
    /// Returns `BankError::DuplicateId` if two problems share an id.
    pub fn new(problems: Vec<Problem>) -> Result<Self, BankError> {
        let mut seen = HashSet::with_capacity(problems.len());
        for problem in &problems {
            if !seen.insert(problem.id()) {
                return Err(BankError::DuplicateId { id: problem.id() });
            }
        }
        Ok(Self {
            problems: problems.into(),
        })
    }

    /// Validate every draft and build a bank from them.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Malformed` for the first draft that fails validation,
    /// or `BankError::DuplicateId`.
    pub fn from_drafts(drafts: Vec<ProblemDraft>) -> Result<Self, BankError> {
        let problems = drafts
            .into_iter()
            .map(|draft| {
                let id = draft.id;
                draft
                    .validate()
                    .map_err(|source| BankError::Malformed { id, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(problems)
    }

    /// The three algebra, geometry and calculus problems shipped with the app.
    ///
    /// # Panics
    ///
    /// Panics if the built-in problems fail validation.
    #[must_use]
    pub fn sample() -> Self {
        Self::from_drafts(sample_drafts()).expect("built-in problems should be valid")
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Problem> {
        self.problems.get(index)
    }

    #[must_use]
    pub fn find(&self, id: ProblemId) -> Option<&Problem> {
        self.problems.iter().find(|problem| problem.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        self.problems.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Problem] {
        &self.problems
    }
}

fn sample_drafts() -> Vec<ProblemDraft> {
    vec![
        ProblemDraft {
            id: ProblemId::new(1),
            question: "What is the value of x in the equation: 2x + 5 = 13?".into(),
            options: vec!["x = 3".into(), "x = 4".into(), "x = 5".into(), "x = 6".into()],
            correct: 1,
            hint: Some("Subtract 5 from both sides, then divide by 2".into()),
            explanation: "2x + 5 = 13 → 2x = 8 → x = 4".into(),
        },
        ProblemDraft {
            id: ProblemId::new(2),
            question: "Find the area of a circle with radius 5 units (π ≈ 3.14)".into(),
            options: vec![
                "78.5 sq units".into(),
                "31.4 sq units".into(),
                "15.7 sq units".into(),
                "62.8 sq units".into(),
            ],
            correct: 0,
            hint: Some("Use the formula A = πr²".into()),
            explanation: "A = π × 5² = 3.14 × 25 = 78.5 square units".into(),
        },
        ProblemDraft {
            id: ProblemId::new(3),
            question: "What is the derivative of f(x) = x³ + 2x²?".into(),
            options: vec![
                "3x² + 4x".into(),
                "x² + 2x".into(),
                "3x² + 2x".into(),
                "x³ + 4x".into(),
            ],
            correct: 0,
            hint: Some("Use the power rule: d/dx(xⁿ) = nxⁿ⁻¹".into()),
            explanation: "f'(x) = 3x² + 4x using the power rule".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(id: u64, correct: usize) -> ProblemDraft {
        ProblemDraft {
            id: ProblemId::new(id),
            question: format!("Q{id}"),
            options: vec!["a".into(), "b".into()],
            correct,
            hint: None,
            explanation: "because".into(),
        }
    }

    #[test]
    fn sample_bank_has_three_valid_problems() {
        let bank = ProblemBank::sample();
        assert_eq!(bank.len(), 3);
        let correct: Vec<_> = bank.iter().map(Problem::correct_index).collect();
        assert_eq!(correct, vec![1, 0, 0]);
        for problem in bank.iter() {
            assert!(problem.correct_index() < problem.option_count());
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = ProblemBank::from_drafts(vec![draft(1, 0), draft(1, 1)]).unwrap_err();
        assert_eq!(
            err,
            BankError::DuplicateId {
                id: ProblemId::new(1)
            }
        );
    }

    #[test]
    fn malformed_draft_reports_its_id() {
        let err = ProblemBank::from_drafts(vec![draft(1, 0), draft(2, 5)]).unwrap_err();
        assert!(matches!(
            err,
            BankError::Malformed {
                id,
                source: ProblemError::CorrectIndexOutOfRange { index: 5, len: 2 },
            } if id == ProblemId::new(2)
        ));
    }

    #[test]
    fn empty_bank_is_constructible() {
        let bank = ProblemBank::new(Vec::new()).unwrap();
        assert!(bank.is_empty());
    }

    #[test]
    fn find_looks_up_by_id() {
        let bank = ProblemBank::sample();
        let problem = bank.find(ProblemId::new(2)).unwrap();
        assert_eq!(problem.correct_index(), 0);
        assert!(bank.find(ProblemId::new(99)).is_none());
    }
}
