//! Line commands accepted by the interactive loops.

use practice_core::model::StepProblemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeCommand {
    /// 1-based option number as typed by the learner.
    Select(usize),
    Next,
    Hint,
    Reset,
    Quit,
}

impl PracticeCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if let Ok(choice) = line.parse::<usize>() {
            return Some(Self::Select(choice));
        }
        match line {
            "n" | "next" => Some(Self::Next),
            "h" | "hint" => Some(Self::Hint),
            "r" | "reset" => Some(Self::Reset),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverCommand {
    Answer(String),
    NextStep,
    PreviousStep,
    Hint,
    Reset,
    Select(StepProblemId),
    Quit,
}

impl SolverCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
        match head {
            "a" | "answer" if !rest.trim().is_empty() => Some(Self::Answer(rest.to_string())),
            "n" | "next" => Some(Self::NextStep),
            "p" | "prev" => Some(Self::PreviousStep),
            "h" | "hint" => Some(Self::Hint),
            "r" | "reset" => Some(Self::Reset),
            "s" | "select" => rest.parse().ok().map(Self::Select),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn practice_commands_parse() {
        assert_eq!(PracticeCommand::parse(" 2 "), Some(PracticeCommand::Select(2)));
        assert_eq!(PracticeCommand::parse("n"), Some(PracticeCommand::Next));
        assert_eq!(PracticeCommand::parse("hint"), Some(PracticeCommand::Hint));
        assert_eq!(PracticeCommand::parse("x"), None);
    }

    #[test]
    fn solver_commands_parse() {
        assert_eq!(
            SolverCommand::parse("a  x = 5"),
            Some(SolverCommand::Answer(" x = 5".into()))
        );
        assert_eq!(SolverCommand::parse("a"), None);
        assert_eq!(
            SolverCommand::parse("s 3"),
            Some(SolverCommand::Select(StepProblemId::new(3)))
        );
        assert_eq!(SolverCommand::parse("s three"), None);
        assert_eq!(SolverCommand::parse("p"), Some(SolverCommand::PreviousStep));
    }
}
