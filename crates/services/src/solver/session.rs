use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

use practice_core::model::{StepProblem, StepProblemId};

use crate::error::SolverError;

/// Step-by-step solver over a fixed set of worked problems.
///
/// One problem is selected at a time. The learner walks the solution steps,
/// may peek at a hint, and submits free-text answers as often as they like.
pub struct SolverSession {
    problems: Vec<StepProblem>,
    selected: usize,
    current_step: usize,
    answer: String,
    hint_visible: bool,
    verdict: Option<bool>,
}

impl SolverSession {
    /// Start on the first problem.
    ///
    /// # Errors
    ///
    /// Returns `SolverError::NoProblems` if `problems` is empty and
    /// `SolverError::DuplicateId` if two problems share an id.
    pub fn new(problems: Vec<StepProblem>) -> Result<Self, SolverError> {
        if problems.is_empty() {
            return Err(SolverError::NoProblems);
        }
        let mut seen = HashSet::with_capacity(problems.len());
        if let Some(dup) = problems.iter().find(|p| !seen.insert(p.id())) {
            warn!(problem_id = %dup.id(), "duplicate step problem id");
            return Err(SolverError::DuplicateId(dup.id()));
        }
        Ok(Self {
            problems,
            selected: 0,
            current_step: 0,
            answer: String::new(),
            hint_visible: false,
            verdict: None,
        })
    }

    /// A solver over the built-in step problems.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            problems: StepProblem::samples(),
            selected: 0,
            current_step: 0,
            answer: String::new(),
            hint_visible: false,
            verdict: None,
        }
    }

    #[must_use]
    pub fn problems(&self) -> &[StepProblem] {
        &self.problems
    }

    #[must_use]
    pub fn problem(&self) -> &StepProblem {
        &self.problems[self.selected]
    }

    /// Switch to another problem and start it from scratch.
    ///
    /// # Errors
    ///
    /// Returns `SolverError::UnknownProblem` if no problem has this id.
    pub fn select_problem(&mut self, id: StepProblemId) -> Result<(), SolverError> {
        let Some(index) = self.problems.iter().position(|p| p.id() == id) else {
            warn!(problem_id = %id, "unknown step problem");
            return Err(SolverError::UnknownProblem(id));
        };
        self.selected = index;
        self.reset();
        debug!(problem_id = %id, "step problem selected");
        Ok(())
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Replace the pending answer text. An earlier verdict stays until the next submit.
    pub fn set_answer(&mut self, answer: impl Into<String>) {
        self.answer = answer.into();
    }

    /// Check the pending answer against the selected problem.
    pub fn submit(&mut self) -> bool {
        let correct = self.problem().accepts(&self.answer);
        self.verdict = Some(correct);
        debug!(problem_id = %self.problem().id(), correct, "answer submitted");
        correct
    }

    /// `None` until the first submission.
    #[must_use]
    pub fn verdict(&self) -> Option<bool> {
        self.verdict
    }

    /// Explanation, shown only after a correct answer.
    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        (self.verdict == Some(true)).then(|| self.problem().explanation())
    }

    #[must_use]
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.problem().steps().len()
    }

    /// Steps up to and including the current one.
    #[must_use]
    pub fn revealed_steps(&self) -> &[String] {
        &self.problem().steps()[..=self.current_step]
    }

    #[must_use]
    pub fn is_step_revealed(&self, index: usize) -> bool {
        index <= self.current_step
    }

    #[must_use]
    pub fn has_next_step(&self) -> bool {
        self.current_step + 1 < self.step_count()
    }

    #[must_use]
    pub fn has_previous_step(&self) -> bool {
        self.current_step > 0
    }

    /// Reveal the next step. Returns false when already on the last step.
    pub fn next_step(&mut self) -> bool {
        if !self.has_next_step() {
            return false;
        }
        self.current_step += 1;
        true
    }

    /// Go back one step. Returns false when already on the first step.
    pub fn previous_step(&mut self) -> bool {
        if !self.has_previous_step() {
            return false;
        }
        self.current_step -= 1;
        true
    }

    #[must_use]
    pub fn is_hint_visible(&self) -> bool {
        self.hint_visible
    }

    pub fn toggle_hint(&mut self) -> bool {
        self.hint_visible = !self.hint_visible;
        self.hint_visible
    }

    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        if self.hint_visible {
            self.problem().hint()
        } else {
            None
        }
    }

    /// Back to step 0 with no answer, hint or verdict. The selected problem is kept.
    pub fn reset(&mut self) {
        self.current_step = 0;
        self.answer.clear();
        self.hint_visible = false;
        self.verdict = None;
    }
}

impl fmt::Debug for SolverSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverSession")
            .field("problems_len", &self.problems.len())
            .field("selected", &self.problem().id())
            .field("current_step", &self.current_step)
            .field("verdict", &self.verdict)
            .finish_non_exhaustive()
    }
}
