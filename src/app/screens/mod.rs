//! TUI screen components
//!
//! Contains individual screen implementations for different application states.

pub mod results;
pub mod running;
pub mod start;

pub use results::{ResultAction, ResultsScreen, RunOutcome};
pub use running::RunningScreen;
pub use start::{StartAction, StartScreen};
