use chrono::{DateTime, Utc};
use rand::rng;
use rand::seq::SliceRandom;
use std::fmt;
use tracing::{debug, info, warn};

use practice_core::Clock;
use practice_core::model::{AnswerRecord, ProblemBank, ProblemDraft, SessionId, SessionSummary};

use super::progress::SessionProgress;
use super::state::SessionState;
use crate::error::SessionError;

//
// ─── BUILDER ───────────────────────────────────────────────────────────────────
//

/// Configures and starts a practice session over a problem bank.
pub struct SessionBuilder<'a> {
    bank: &'a ProblemBank,
    clock: Clock,
    shuffle: bool,
}

impl<'a> SessionBuilder<'a> {
    #[must_use]
    pub fn new(bank: &'a ProblemBank) -> Self {
        Self {
            bank,
            clock: Clock::default(),
            shuffle: false,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Work through the problems in random order. The bank itself is untouched.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// # Errors
    ///
    /// Returns `SessionError::EmptyBank` if the bank has no problems.
    pub fn start(self) -> Result<SessionController, SessionError> {
        if self.bank.is_empty() {
            warn!("refusing to start a session on an empty bank");
            return Err(SessionError::EmptyBank);
        }

        let problems = if self.shuffle {
            let mut problems = self.bank.as_slice().to_vec();
            problems.shuffle(&mut rng());
            ProblemBank::new(problems)?
        } else {
            self.bank.clone()
        };

        let id = SessionId::generate();
        info!(
            session_id = %id,
            problems = problems.len(),
            shuffle = self.shuffle,
            "practice session started"
        );

        Ok(SessionController {
            id,
            clock: self.clock,
            state: SessionState::new(problems),
            answers: Vec::new(),
            started_at: self.clock.now(),
            completed_at: None,
        })
    }
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Owns a practice session and performs every state transition on it.
///
/// ```text
///   UNANSWERED --select_answer(i)--> REVEALED
///   REVEALED   --advance()---------> UNANSWERED (next problem)
///   any        --reset()-----------> UNANSWERED (problem 0)
/// ```
///
/// A rejected operation returns an error and leaves the state as it was.
pub struct SessionController {
    id: SessionId,
    clock: Clock,
    state: SessionState,
    answers: Vec<AnswerRecord>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl SessionController {
    /// Start a session over `bank` in bank order with the system clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyBank` if the bank has no problems.
    pub fn start(bank: &ProblemBank) -> Result<Self, SessionError> {
        SessionBuilder::new(bank).start()
    }

    /// Validate raw problem drafts and start a session over them.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::MalformedProblem` if any draft is invalid or ids
    /// repeat, and `SessionError::EmptyBank` if there are no drafts.
    pub fn from_drafts(drafts: Vec<ProblemDraft>) -> Result<Self, SessionError> {
        let bank = ProblemBank::from_drafts(drafts)?;
        Self::start(&bank)
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            position: self.state.current_index + 1,
            total: self.state.total(),
            score: self.state.score,
            answered: self.answers.len(),
            is_complete: self.state.is_complete(),
            fraction: self.state.progress_fraction(),
        }
    }

    /// Answer the current problem and reveal the result.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` if the current problem was already
    /// answered, and `SessionError::OutOfRange` if `index` is not an option.
    pub fn select_answer(&mut self, index: usize) -> Result<AnswerRecord, SessionError> {
        let problem_index = self.state.current_index;
        if self.state.revealed {
            warn!(session_id = %self.id, problem_index, index, "answer already revealed");
            return Err(SessionError::InvalidState { problem_index });
        }

        let problem = self.state.current_problem();
        let len = problem.option_count();
        if index >= len {
            warn!(session_id = %self.id, problem_index, index, len, "answer index out of range");
            return Err(SessionError::OutOfRange { index, len });
        }

        let problem_id = problem.id();
        let correct = problem.is_correct(index);
        let answered_at = self.clock.now();

        self.state.selected_answer = Some(index);
        self.state.revealed = true;
        if correct {
            self.state.score += 1;
        }
        if self.state.is_complete() {
            self.completed_at = Some(answered_at);
        }

        debug!(
            session_id = %self.id,
            problem_id = %problem_id,
            index,
            correct,
            score = self.state.score,
            "answer selected"
        );

        let record = AnswerRecord::new(problem_id, index, correct, answered_at);
        self.answers.push(record.clone());
        Ok(record)
    }

    /// Move to the next problem, clearing selection, reveal and hint.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` when already at the last problem.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        let len = self.state.total();
        let next = self.state.current_index + 1;
        if next >= len {
            warn!(session_id = %self.id, index = self.state.current_index, "no problem to advance to");
            return Err(SessionError::OutOfRange { index: next, len });
        }

        self.state.current_index = next;
        self.state.selected_answer = None;
        self.state.revealed = false;
        self.state.hint_visible = false;

        debug!(session_id = %self.id, index = next, "advanced to next problem");
        Ok(())
    }

    /// Flip hint visibility and return the new value.
    pub fn toggle_hint(&mut self) -> bool {
        self.state.hint_visible = !self.state.hint_visible;
        debug!(session_id = %self.id, visible = self.state.hint_visible, "hint toggled");
        self.state.hint_visible
    }

    /// Return to the first problem with a zero score.
    pub fn reset(&mut self) {
        self.state.clear();
        self.answers.clear();
        self.started_at = self.clock.now();
        self.completed_at = None;
        info!(session_id = %self.id, "practice session reset");
    }

    /// Summarize a finished session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Incomplete` if the last problem is not answered yet.
    pub fn summary(&self) -> Result<SessionSummary, SessionError> {
        let completed_at = self.completed_at.ok_or(SessionError::Incomplete)?;
        Ok(SessionSummary::from_records(
            self.started_at,
            completed_at,
            self.state.total(),
            &self.answers,
        )?)
    }

    /// Test hook: replace the clock after construction.
    #[cfg(test)]
    pub(crate) fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("id", &self.id)
            .field("problems_len", &self.state.total())
            .field("current_index", &self.state.current_index)
            .field("revealed", &self.state.revealed)
            .field("score", &self.state.score)
            .field("answers_len", &self.answers.len())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::{OptionFeedback, OptionStatus};
    use chrono::Duration;
    use practice_core::model::ProblemId;
    use practice_core::time::{fixed_clock, fixed_now};

    fn draft(id: u64, correct: usize) -> ProblemDraft {
        ProblemDraft {
            id: ProblemId::new(id),
            question: format!("Question {id}"),
            options: vec!["a".into(), "b".into(), "c".into()],
            correct,
            hint: Some(format!("hint {id}")),
            explanation: format!("explanation {id}"),
        }
    }

    fn bank(correct: &[usize]) -> ProblemBank {
        let drafts = correct
            .iter()
            .enumerate()
            .map(|(i, &c)| draft(i as u64 + 1, c))
            .collect();
        ProblemBank::from_drafts(drafts).unwrap()
    }

    fn session(correct: &[usize]) -> SessionController {
        SessionBuilder::new(&bank(correct))
            .with_clock(fixed_clock())
            .start()
            .unwrap()
    }

    #[test]
    fn starts_unanswered_at_first_problem() {
        let s = session(&[1, 0, 0]);
        let state = s.state();
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.selected_answer(), None);
        assert!(!state.is_revealed());
        assert_eq!(state.score(), 0);
        assert!(!state.is_hint_visible());
        assert_eq!(s.started_at(), fixed_now());
    }

    #[test]
    fn empty_bank_is_rejected() {
        let empty = ProblemBank::new(Vec::new()).unwrap();
        let err = SessionController::start(&empty).unwrap_err();
        assert_eq!(err, SessionError::EmptyBank);
    }

    #[test]
    fn malformed_drafts_are_rejected() {
        let err = SessionController::from_drafts(vec![draft(1, 3)]).unwrap_err();
        assert!(matches!(err, SessionError::MalformedProblem(_)));
    }

    #[test]
    fn correct_answer_scores_once() {
        let mut s = session(&[1, 0]);
        let record = s.select_answer(1).unwrap();
        assert!(record.correct);
        assert_eq!(s.answers(), &[record.clone()]);
        assert_eq!(record.problem_id, ProblemId::new(1));
        assert_eq!(s.state().score(), 1);
        assert!(s.state().is_correct());

        let err = s.select_answer(1).unwrap_err();
        assert_eq!(err, SessionError::InvalidState { problem_index: 0 });
        assert_eq!(s.state().score(), 1);
        assert_eq!(s.answers().len(), 1);
    }

    #[test]
    fn wrong_answer_reveals_without_scoring() {
        let mut s = session(&[1, 0]);
        let record = s.select_answer(2).unwrap();
        assert!(!record.correct);
        assert!(s.state().is_revealed());
        assert!(!s.state().is_correct());
        assert_eq!(s.state().score(), 0);
        assert_eq!(s.state().current_explanation(), Some("explanation 1"));
    }

    #[test]
    fn out_of_range_answer_leaves_state_unchanged() {
        let mut s = session(&[0, 0]);
        let before = s.state().clone();
        let err = s.select_answer(3).unwrap_err();
        assert_eq!(err, SessionError::OutOfRange { index: 3, len: 3 });
        assert_eq!(s.state(), &before);
        assert!(s.answers().is_empty());
    }

    #[test]
    fn advance_clears_per_problem_state() {
        let mut s = session(&[0, 0]);
        s.toggle_hint();
        s.select_answer(0).unwrap();
        s.advance().unwrap();

        let state = s.state();
        assert_eq!(state.current_index(), 1);
        assert_eq!(state.selected_answer(), None);
        assert!(!state.is_revealed());
        assert!(!state.is_hint_visible());
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn advance_at_last_problem_is_rejected() {
        let mut s = session(&[0, 0]);
        s.advance().unwrap();
        s.select_answer(1).unwrap();
        let before = s.state().clone();

        let err = s.advance().unwrap_err();
        assert_eq!(err, SessionError::OutOfRange { index: 2, len: 2 });
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn hint_toggles_independently_of_reveal() {
        let mut s = session(&[0]);
        assert_eq!(s.state().current_hint(), None);
        assert!(s.toggle_hint());
        assert_eq!(s.state().current_hint(), Some("hint 1"));
        s.select_answer(0).unwrap();
        assert!(s.state().is_hint_visible());
        assert!(!s.toggle_hint());
        assert_eq!(s.state().current_hint(), None);
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut s = session(&[0, 1, 2]);
        s.select_answer(0).unwrap();
        s.advance().unwrap();
        s.toggle_hint();
        s.select_answer(1).unwrap();
        s.clock_mut().advance(Duration::minutes(5));

        s.reset();

        let state = s.state();
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.score(), 0);
        assert!(!state.is_revealed());
        assert_eq!(state.selected_answer(), None);
        assert!(!state.is_hint_visible());
        assert!(s.answers().is_empty());
        assert_eq!(s.started_at(), fixed_now() + Duration::minutes(5));
        assert_eq!(s.completed_at(), None);
    }

    #[test]
    fn completion_and_progress() {
        let mut s = session(&[0, 0]);
        assert!((s.state().progress_fraction() - 0.5).abs() < f64::EPSILON);
        assert!(!s.state().can_advance());

        s.select_answer(0).unwrap();
        assert!(s.state().can_advance());
        assert!(!s.state().is_complete());

        s.advance().unwrap();
        assert!((s.state().progress_fraction() - 1.0).abs() < f64::EPSILON);
        assert!(!s.state().is_complete());

        s.select_answer(2).unwrap();
        assert!(s.state().is_complete());
        assert!(!s.state().can_advance());

        let progress = s.progress();
        assert_eq!(progress.position, 2);
        assert_eq!(progress.total, 2);
        assert_eq!(progress.score, 1);
        assert_eq!(progress.answered, 2);
        assert!(progress.is_complete);
    }

    #[test]
    fn summary_requires_completion() {
        let mut s = session(&[0, 1]);
        assert_eq!(s.summary().unwrap_err(), SessionError::Incomplete);

        s.select_answer(0).unwrap();
        s.advance().unwrap();
        s.clock_mut().advance(Duration::seconds(40));
        s.select_answer(0).unwrap();

        let summary = s.summary().unwrap();
        assert_eq!(summary.total(), 2);
        assert_eq!(summary.answered(), 2);
        assert_eq!(summary.correct(), 1);
        assert_eq!(summary.completed_at(), fixed_now() + Duration::seconds(40));
    }

    #[test]
    fn skipping_ahead_counts_only_answered_problems() {
        let mut s = session(&[0, 0, 0]);
        s.advance().unwrap();
        s.advance().unwrap();
        s.select_answer(0).unwrap();

        let summary = s.summary().unwrap();
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.answered(), 1);
        assert_eq!(summary.correct(), 1);
    }

    #[test]
    fn option_feedback_follows_reveal() {
        let mut s = session(&[1]);
        assert!(
            s.state()
                .option_feedback()
                .iter()
                .all(|o| o.status == OptionStatus::Neutral)
        );

        s.select_answer(2).unwrap();
        let feedback = s.state().option_feedback();
        assert_eq!(
            feedback,
            vec![
                OptionFeedback { index: 0, text: "a", status: OptionStatus::Dimmed },
                OptionFeedback { index: 1, text: "b", status: OptionStatus::Correct },
                OptionFeedback { index: 2, text: "c", status: OptionStatus::Incorrect },
            ]
        );
        assert!(feedback.iter().all(|o| !o.status.is_selectable()));
    }

    #[test]
    fn shuffled_session_keeps_every_problem() {
        let source = bank(&[0, 1, 2, 0, 1, 2, 0, 1]);
        let s = SessionBuilder::new(&source)
            .with_shuffle(true)
            .start()
            .unwrap();

        let mut ids: Vec<_> = s.state().problems().iter().map(|p| p.id()).collect();
        ids.sort();
        let expected: Vec<_> = source.iter().map(|p| p.id()).collect();
        assert_eq!(ids, expected);
        assert_eq!(source.get(0).unwrap().id(), ProblemId::new(1));
    }
}
