/// How an answer option should be presented for the current problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionStatus {
    /// Not yet answered; the option is selectable.
    Neutral,
    /// The correct option, after reveal.
    Correct,
    /// The learner's wrong pick, after reveal.
    Incorrect,
    /// Any other option after reveal.
    Dimmed,
}

impl OptionStatus {
    /// Options can only be picked before the answer is revealed.
    #[must_use]
    pub fn is_selectable(self) -> bool {
        matches!(self, OptionStatus::Neutral)
    }
}

/// Presentation-agnostic view of one answer option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionFeedback<'a> {
    pub index: usize,
    pub text: &'a str,
    pub status: OptionStatus,
}
