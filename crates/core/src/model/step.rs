use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::StepProblemId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepProblemError {
    #[error("question text cannot be empty")]
    EmptyQuestion,

    #[error("expected answer cannot be empty")]
    EmptyAnswer,

    #[error("a step problem needs at least one solution step")]
    NoSteps,

    #[error("solution step {index} is empty")]
    EmptyStep { index: usize },

    #[error("step problem {id} appears more than once")]
    DuplicateId { id: StepProblemId },
}

//
// ─── STEP PROBLEM ──────────────────────────────────────────────────────────────
//

/// Unvalidated step-by-step problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepProblemDraft {
    pub id: StepProblemId,
    #[serde(alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    pub question: String,
    #[serde(default, alias = "visualAid")]
    pub visual_aid: Option<String>,
    pub answer: String,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub explanation: String,
    pub steps: Vec<String>,
}

impl StepProblemDraft {
    /// Validate the draft into a `StepProblem`.
    ///
    /// # Errors
    ///
    /// Returns `StepProblemError` for a blank question or answer, or when the
    /// solution has no steps or a blank step.
    pub fn validate(self) -> Result<StepProblem, StepProblemError> {
        let question = self.question.trim();
        if question.is_empty() {
            return Err(StepProblemError::EmptyQuestion);
        }
        let answer = self.answer.trim();
        if answer.is_empty() {
            return Err(StepProblemError::EmptyAnswer);
        }
        if self.steps.is_empty() {
            return Err(StepProblemError::NoSteps);
        }
        let mut steps = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            let step = step.trim();
            if step.is_empty() {
                return Err(StepProblemError::EmptyStep { index });
            }
            steps.push(step.to_string());
        }

        Ok(StepProblem {
            id: self.id,
            kind: self.kind.trim().to_string(),
            description: self.description.trim().to_string(),
            question: question.to_string(),
            visual_aid: normalize_optional(self.visual_aid),
            answer: answer.to_string(),
            hint: normalize_optional(self.hint),
            explanation: self.explanation.trim().to_string(),
            steps,
        })
    }

    /// Validate a whole set of drafts, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns the first validation error, or `StepProblemError::DuplicateId`
    /// if two drafts share an id.
    pub fn validate_all(drafts: Vec<Self>) -> Result<Vec<StepProblem>, StepProblemError> {
        let mut seen = HashSet::with_capacity(drafts.len());
        drafts
            .into_iter()
            .map(|draft| {
                if !seen.insert(draft.id) {
                    return Err(StepProblemError::DuplicateId { id: draft.id });
                }
                draft.validate()
            })
            .collect()
    }
}

/// A problem worked through one solution step at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepProblem {
    id: StepProblemId,
    kind: String,
    description: String,
    question: String,
    visual_aid: Option<String>,
    answer: String,
    hint: Option<String>,
    explanation: String,
    steps: Vec<String>,
}

impl StepProblem {
    #[must_use]
    pub fn id(&self) -> StepProblemId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn visual_aid(&self) -> Option<&str> {
        self.visual_aid.as_deref()
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Solution steps; never empty.
    #[must_use]
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Checks a learner's answer. Surrounding whitespace is ignored, the rest
    /// must match exactly.
    #[must_use]
    pub fn accepts(&self, answer: &str) -> bool {
        answer.trim() == self.answer
    }

    /// Built-in step problems.
    ///
    /// # Panics
    ///
    /// Panics if a built-in problem fails validation.
    #[must_use]
    pub fn samples() -> Vec<StepProblem> {
        StepProblemDraft::validate_all(sample_drafts())
            .expect("built-in step problems should be valid")
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

fn sample_drafts() -> Vec<StepProblemDraft> {
    vec![
        StepProblemDraft {
            id: StepProblemId::new(1),
            kind: "Linear Equations".into(),
            description: "Solve for the unknown variable".into(),
            question: "Solve for x: 2x + 5 = 15".into(),
            visual_aid: Some("Balance scale: 2x + 5 on the left, 15 on the right".into()),
            answer: "5".into(),
            hint: Some("Undo the addition first, then the multiplication".into()),
            explanation: "Subtracting 5 gives 2x = 10, and dividing by 2 gives x = 5".into(),
            steps: vec![
                "Start with 2x + 5 = 15".into(),
                "Subtract 5 from both sides: 2x = 10".into(),
                "Divide both sides by 2: x = 5".into(),
            ],
        },
        StepProblemDraft {
            id: StepProblemId::new(2),
            kind: "Quadratic Equations".into(),
            description: "Factor and find the roots".into(),
            question: "Find the positive root of x² - 5x + 6 = 0".into(),
            visual_aid: Some("Parabola crossing the x-axis at two points".into()),
            answer: "3".into(),
            hint: Some("Look for two numbers that multiply to 6 and add to -5".into()),
            explanation: "x² - 5x + 6 = (x - 2)(x - 3), so the roots are 2 and 3".into(),
            steps: vec![
                "Write the equation: x² - 5x + 6 = 0".into(),
                "Factor: (x - 2)(x - 3) = 0".into(),
                "Set each factor to zero: x = 2 or x = 3".into(),
                "The larger root is x = 3".into(),
            ],
        },
        StepProblemDraft {
            id: StepProblemId::new(3),
            kind: "Geometry".into(),
            description: "Area and perimeter of shapes".into(),
            question: "A rectangle is 8 units long and 5 units wide. What is its area?".into(),
            visual_aid: Some("Rectangle with sides labelled 8 and 5".into()),
            answer: "40".into(),
            hint: Some("Area of a rectangle is length × width".into()),
            explanation: "A = 8 × 5 = 40 square units".into(),
            steps: vec![
                "Identify length = 8 and width = 5".into(),
                "Apply A = length × width".into(),
                "Compute 8 × 5 = 40".into(),
            ],
        },
    ]
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
