use std::io::Read;

use serde::Deserialize;
use tracing::debug;

use practice_core::model::{ProblemBank, ProblemDraft, StepProblem, StepProblemDraft};

use crate::error::BankLoadError;

/// On-disk shape of a problem bank file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct BankFile {
    #[serde(default)]
    problems: Vec<ProblemDraft>,
    #[serde(default, alias = "stepProblems")]
    step_problems: Vec<StepProblemDraft>,
}

/// Validated content of a bank file.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedBank {
    pub problems: ProblemBank,
    pub step_problems: Vec<StepProblem>,
}

/// Parses problem banks from JSON.
///
/// ```json
/// {
///   "problems": [
///     { "id": 1, "question": "...", "options": ["a", "b"], "correct": 1,
///       "hint": "...", "explanation": "..." }
///   ],
///   "step_problems": [
///     { "id": 1, "type": "Linear", "question": "...", "answer": "5",
///       "steps": ["..."] }
///   ]
/// }
/// ```
pub struct BankLoader;

impl BankLoader {
    /// Parse and validate a bank from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `BankLoadError::Json` for malformed JSON and
    /// `BankLoadError::Invalid` when a problem fails validation.
    pub fn from_json_str(raw: &str) -> Result<LoadedBank, BankLoadError> {
        let file: BankFile = serde_json::from_str(raw)?;
        Self::validate(file)
    }

    /// Parse and validate a bank from any reader.
    ///
    /// # Errors
    ///
    /// Same as [`BankLoader::from_json_str`].
    pub fn from_reader(reader: impl Read) -> Result<LoadedBank, BankLoadError> {
        let file: BankFile = serde_json::from_reader(reader)?;
        Self::validate(file)
    }

    fn validate(file: BankFile) -> Result<LoadedBank, BankLoadError> {
        let problems = ProblemBank::from_drafts(file.problems).map_err(practice_core::Error::from)?;
        let step_problems = StepProblemDraft::validate_all(file.step_problems)
            .map_err(practice_core::Error::from)?;

        debug!(
            problems = problems.len(),
            step_problems = step_problems.len(),
            "problem bank loaded"
        );

        Ok(LoadedBank {
            problems,
            step_problems,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use practice_core::model::{
        BankError, ProblemError, ProblemId, StepProblemError, StepProblemId,
    };

    #[test]
    fn loads_problems_and_step_problems() {
        let raw = r#"{
            "problems": [
                { "id": 1, "question": "1 + 1?", "options": ["1", "2"], "correct": 1,
                  "hint": "count", "explanation": "1 + 1 = 2" }
            ],
            "stepProblems": [
                { "id": 4, "type": "Arithmetic", "question": "2 × 3", "answer": "6",
                  "visualAid": "two rows of three", "steps": ["2 × 3 = 6"] }
            ]
        }"#;

        let loaded = BankLoader::from_json_str(raw).unwrap();
        assert_eq!(loaded.problems.len(), 1);
        assert_eq!(loaded.problems.get(0).unwrap().hint(), Some("count"));
        assert_eq!(loaded.step_problems.len(), 1);
        assert_eq!(loaded.step_problems[0].kind(), "Arithmetic");
        assert_eq!(
            loaded.step_problems[0].visual_aid(),
            Some("two rows of three")
        );
    }

    #[test]
    fn missing_sections_load_as_empty() {
        let loaded = BankLoader::from_reader("{}".as_bytes()).unwrap();
        assert!(loaded.problems.is_empty());
        assert!(loaded.step_problems.is_empty());
    }

    #[test]
    fn malformed_problem_is_reported() {
        let raw = r#"{ "problems": [
            { "id": 7, "question": "?", "options": ["a", "b"], "correct": 2, "explanation": "x" }
        ] }"#;

        let err = BankLoader::from_json_str(raw).unwrap_err();
        assert!(matches!(
            err,
            BankLoadError::Invalid(practice_core::Error::Bank(BankError::Malformed {
                id,
                source: ProblemError::CorrectIndexOutOfRange { index: 2, len: 2 },
            })) if id == ProblemId::new(7)
        ));
    }

    #[test]
    fn malformed_step_problem_is_reported() {
        let raw = r#"{ "step_problems": [
            { "id": 1, "kind": "x", "question": "?", "answer": "1", "steps": [] }
        ] }"#;

        let err = BankLoader::from_json_str(raw).unwrap_err();
        assert!(matches!(
            err,
            BankLoadError::Invalid(practice_core::Error::StepProblem(StepProblemError::NoSteps))
        ));
    }

    #[test]
    fn duplicate_step_problem_ids_are_reported() {
        let raw = r#"{ "step_problems": [
            { "id": 1, "kind": "x", "question": "first", "answer": "1", "steps": ["a"] },
            { "id": 1, "kind": "x", "question": "second", "answer": "2", "steps": ["b"] }
        ] }"#;

        let err = BankLoader::from_json_str(raw).unwrap_err();
        assert!(matches!(
            err,
            BankLoadError::Invalid(practice_core::Error::StepProblem(
                StepProblemError::DuplicateId { id }
            )) if id == StepProblemId::new(1)
        ));
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = BankLoader::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, BankLoadError::Json(_)));
    }
}
