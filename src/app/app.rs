//! Main application controller
//!
//! Manages the TUI, application state, and screen rendering loop.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::{
    app::{
        screens::{ResultAction, ResultsScreen, RunningScreen, StartAction, StartScreen},
        state::{AppState, NavigationAction, StateManager},
        tui::Tui,
    },
    bench::{BenchmarkRunner, ProgressUpdate},
    config::Settings,
    models::{BenchmarkResult, SystemInfo},
    Result,
};

/// Capacity of the progress channel; one slot per unit is plenty
const PROGRESS_CHANNEL_CAPACITY: usize = 256;

/// TUI application controller
pub struct App {
    /// Terminal UI handler
    tui: Tui,
    /// Application state manager
    state_manager: StateManager,
    /// Runner shared with the spawned run task
    runner: Arc<BenchmarkRunner>,
    /// Screen components
    start_screen: StartScreen,
    running_screen: RunningScreen,
    results_screen: ResultsScreen,
    /// Result of the run in flight
    pending_result: Option<oneshot::Receiver<Result<BenchmarkResult>>>,
    /// Progress receiver for the run in flight
    progress_rx: Option<mpsc::Receiver<ProgressUpdate>>,
}

impl App {
    /// Create a new application instance from loaded settings
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;

        let system_info = SystemInfo::detect();
        let runner = BenchmarkRunner::system(settings.benchmark.clone())?
            .with_system_info(system_info.clone());

        let start_screen = StartScreen::new(
            system_info.clone(),
            runner.processing_units(),
            settings.benchmark.workload_size,
            settings.references.len(),
        );
        let results_screen = ResultsScreen::new(settings.references, system_info.cpu);

        Ok(Self {
            tui: Tui::new()?,
            state_manager: StateManager::new(),
            runner: Arc::new(runner),
            start_screen,
            running_screen: RunningScreen::new(),
            results_screen,
            pending_result: None,
            progress_rx: None,
        })
    }

    /// Initialize the application and TUI
    pub fn init(&mut self) -> Result<()> {
        self.tui.init()
    }

    /// Run the main application loop
    pub async fn run(&mut self) -> Result<()> {
        while !self.state_manager.should_quit() {
            self.poll_run();
            self.draw()?;
            self.handle_events()?;
            // Let the spawned run task make progress on a current-thread runtime
            tokio::task::yield_now().await;
        }

        self.tui.restore()
    }

    /// Dispatch a run unless one is already in flight
    fn start_run(&mut self) {
        if !self.state_manager.can_start_run() || self.pending_result.is_some() {
            tracing::debug!("run requested while another is in flight, ignoring");
            return;
        }

        let units = self.runner.processing_units();
        self.start_screen.set_processing_units(units);
        self.running_screen
            .reset(units, self.runner.config().workload_size);

        let (progress_tx, progress_rx) = mpsc::channel(PROGRESS_CHANNEL_CAPACITY);
        let (result_tx, result_rx) = oneshot::channel();
        let runner = Arc::clone(&self.runner);

        tokio::spawn(async move {
            let result = runner.run_with_progress(progress_tx).await;
            // The receiver is gone only if the app is shutting down
            let _ = result_tx.send(result);
        });

        self.progress_rx = Some(progress_rx);
        self.pending_result = Some(result_rx);
        self.state_manager.transition_to(AppState::Running);
    }

    /// Drain progress and pick up the finished result without blocking
    fn poll_run(&mut self) {
        if let Some(rx) = &mut self.progress_rx {
            while let Ok(progress) = rx.try_recv() {
                self.running_screen.update_progress(progress);
            }
        }

        let Some(rx) = &mut self.pending_result else {
            return;
        };

        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => Err(crate::CpuOrbError::ExecutionFailure(
                "benchmark task ended without a result".to_string(),
            )),
        };

        self.pending_result = None;
        self.progress_rx = None;

        match outcome {
            Ok(result) => {
                tracing::info!(score = result.score, "run complete");
                self.results_screen.set_result(result);
            }
            Err(err) => {
                tracing::error!(error = %err, "run failed");
                self.results_screen.set_error(&err);
            }
        }

        self.state_manager.transition_to(AppState::Results);
    }

    /// Draw the current screen
    fn draw(&mut self) -> Result<()> {
        let state = self.state_manager.current_state();
        let start_screen = &mut self.start_screen;
        let running_screen = &mut self.running_screen;
        let results_screen = &mut self.results_screen;

        self.tui.draw(|f| match state {
            AppState::Start => start_screen.render(f),
            AppState::Running => running_screen.render(f),
            AppState::Results => results_screen.render(f),
        })
    }

    /// Handle keyboard events and update state
    fn handle_events(&mut self) -> Result<()> {
        let Some(key) = self.tui.next_key()? else {
            return Ok(());
        };

        let action = StateManager::key_to_navigation(key);
        if self.state_manager.handle_navigation(action) {
            return Ok(());
        }

        match self.state_manager.current_state() {
            AppState::Start => self.handle_start_screen(action),
            AppState::Results => self.handle_results_screen(action),
            AppState::Running => {}
        }

        Ok(())
    }

    fn handle_start_screen(&mut self, action: NavigationAction) {
        match action {
            NavigationAction::Up => self.start_screen.select_previous(),
            NavigationAction::Down => self.start_screen.select_next(),
            NavigationAction::Run => self.start_run(),
            NavigationAction::Select => match self.start_screen.selected_action() {
                StartAction::RunBenchmark => self.start_run(),
                StartAction::Quit => self.state_manager.quit(),
            },
            _ => {}
        }
    }

    fn handle_results_screen(&mut self, action: NavigationAction) {
        match action {
            NavigationAction::Left | NavigationAction::Up => {
                self.results_screen.select_previous_action()
            }
            NavigationAction::Right | NavigationAction::Down => {
                self.results_screen.select_next_action()
            }
            NavigationAction::Run => self.start_run(),
            NavigationAction::Select => match self.results_screen.selected_action() {
                ResultAction::RunAgain => self.start_run(),
                ResultAction::Back => self.state_manager.transition_to(AppState::Start),
            },
            _ => {}
        }
    }
}
