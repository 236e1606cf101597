mod controller;
mod feedback;
mod progress;
mod state;

// Public API of the practice session subsystem.
pub use crate::error::SessionError;
pub use controller::{SessionBuilder, SessionController};
pub use feedback::{OptionFeedback, OptionStatus};
pub use progress::SessionProgress;
pub use state::SessionState;
