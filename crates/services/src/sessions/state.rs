use practice_core::model::{Problem, ProblemBank};

use super::feedback::{OptionFeedback, OptionStatus};

/// Plain state record of a practice session.
///
/// Fields are only written by `SessionController`; everything here is a
/// read-only view or a pure query over the record.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub(super) problems: ProblemBank,
    pub(super) current_index: usize,
    pub(super) selected_answer: Option<usize>,
    pub(super) revealed: bool,
    pub(super) score: usize,
    pub(super) hint_visible: bool,
}

impl SessionState {
    /// `problems` must be non-empty.
    pub(super) fn new(problems: ProblemBank) -> Self {
        debug_assert!(!problems.is_empty());
        Self {
            problems,
            current_index: 0,
            selected_answer: None,
            revealed: false,
            score: 0,
            hint_visible: false,
        }
    }

    pub(super) fn clear(&mut self) {
        self.current_index = 0;
        self.selected_answer = None;
        self.revealed = false;
        self.score = 0;
        self.hint_visible = false;
    }

    #[must_use]
    pub fn problems(&self) -> &ProblemBank {
        &self.problems
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<usize> {
        self.selected_answer
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn is_hint_visible(&self) -> bool {
        self.hint_visible
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.problems.len()
    }

    #[must_use]
    pub fn current_problem(&self) -> &Problem {
        &self.problems.as_slice()[self.current_index]
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.problems.len()
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.revealed
            && self
                .selected_answer
                .is_some_and(|selected| self.current_problem().is_correct(selected))
    }

    /// The last problem has been answered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.is_last() && self.revealed
    }

    /// Whether a "next problem" control should be offered.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.revealed && !self.is_last()
    }

    /// `(current_index + 1) / total`, always in `(0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_fraction(&self) -> f64 {
        (self.current_index + 1) as f64 / self.problems.len() as f64
    }

    /// Hint text, only while the hint is toggled on.
    #[must_use]
    pub fn current_hint(&self) -> Option<&str> {
        if self.hint_visible {
            self.current_problem().hint()
        } else {
            None
        }
    }

    /// Explanation text, only once the answer is revealed.
    #[must_use]
    pub fn current_explanation(&self) -> Option<&str> {
        self.revealed
            .then(|| self.current_problem().explanation())
    }

    /// Per-option status for the current problem.
    #[must_use]
    pub fn option_feedback(&self) -> Vec<OptionFeedback<'_>> {
        let problem = self.current_problem();
        problem
            .options()
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let status = if !self.revealed {
                    OptionStatus::Neutral
                } else if problem.is_correct(index) {
                    OptionStatus::Correct
                } else if self.selected_answer == Some(index) {
                    OptionStatus::Incorrect
                } else {
                    OptionStatus::Dimmed
                };
                OptionFeedback {
                    index,
                    text: text.as_str(),
                    status,
                }
            })
            .collect()
    }
}
