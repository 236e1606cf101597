/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionProgress {
    /// 1-based position of the current problem.
    pub position: usize,
    pub total: usize,
    pub score: usize,
    pub answered: usize,
    pub is_complete: bool,
    pub fraction: f64,
}
