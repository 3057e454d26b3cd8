//! Application state management
//!
//! Handles screen transitions and maps keyboard input to navigation
//! actions for the TUI application.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application screens/states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Main menu with system overview
    #[default]
    Start,
    /// Benchmark in flight
    Running,
    /// Comparison chart for the last run
    Results,
}

/// Navigation actions that can be triggered by keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    /// Move selection up (arrow up, k)
    Up,
    /// Move selection down (arrow down, j)
    Down,
    /// Move selection left (arrow left, h)
    Left,
    /// Move selection right (arrow right, l)
    Right,
    /// Confirm selection (Enter, Space)
    Select,
    /// Go back (Esc, Backspace)
    Back,
    /// Quit application (q, Q, Ctrl+C)
    Quit,
    /// Start a run from any idle screen (r)
    Run,
    /// No action
    None,
}

/// Application state manager
#[derive(Debug, Default)]
pub struct StateManager {
    current_state: AppState,
    should_quit: bool,
}

impl StateManager {
    /// Create a new state manager starting at the main menu
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_state(&self) -> AppState {
        self.current_state
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Whether a new run may be started from the current state
    pub fn can_start_run(&self) -> bool {
        self.current_state != AppState::Running
    }

    /// Transition to a new state
    pub fn transition_to(&mut self, new_state: AppState) {
        if new_state != self.current_state {
            tracing::debug!(from = ?self.current_state, to = ?new_state, "screen transition");
            self.current_state = new_state;
        }
    }

    /// Handle the navigation actions that do not depend on screen contents
    ///
    /// Returns `true` when the action was consumed.
    pub fn handle_navigation(&mut self, action: NavigationAction) -> bool {
        match (self.current_state, action) {
            (_, NavigationAction::Quit) => {
                self.should_quit = true;
                true
            }
            (AppState::Start, NavigationAction::Back) => {
                self.should_quit = true;
                true
            }
            (AppState::Results, NavigationAction::Back) => {
                self.transition_to(AppState::Start);
                true
            }
            // A running benchmark cannot be interrupted
            (AppState::Running, _) => true,
            _ => false,
        }
    }

    /// Convert keyboard event to navigation action
    pub fn key_to_navigation(key: KeyEvent) -> NavigationAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => NavigationAction::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                NavigationAction::Quit
            }

            KeyCode::Up | KeyCode::Char('k') => NavigationAction::Up,
            KeyCode::Down | KeyCode::Char('j') => NavigationAction::Down,
            KeyCode::Left | KeyCode::Char('h') => NavigationAction::Left,
            KeyCode::Right | KeyCode::Char('l') => NavigationAction::Right,

            KeyCode::Enter | KeyCode::Char(' ') => NavigationAction::Select,
            KeyCode::Esc | KeyCode::Backspace => NavigationAction::Back,
            KeyCode::Char('r') | KeyCode::Char('R') => NavigationAction::Run,

            _ => NavigationAction::None,
        }
    }
}
