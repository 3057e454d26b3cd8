//! Running screen implementation
//!
//! Shows how many workload units have finished while the benchmark is in
//! flight. The run cannot be cancelled, so the only key that works here is
//! quit.

use std::time::{Duration, Instant};

use crate::bench::ProgressUpdate;
use crate::util::units::{format_duration, format_iterations};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge, Paragraph, Row, Table},
    Frame,
};

/// Running screen component
#[derive(Debug, Default)]
pub struct RunningScreen {
    /// Latest progress from the runner
    current_progress: Option<ProgressUpdate>,
    /// Units dispatched for this run
    total_units: usize,
    /// Iterations per unit
    workload_size: u64,
    /// When the run was requested, for the elapsed clock between updates
    started_at: Option<Instant>,
}

impl RunningScreen {
    /// Create a new running screen
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare for a fresh run
    pub fn reset(&mut self, total_units: usize, workload_size: u64) {
        self.current_progress = None;
        self.total_units = total_units;
        self.workload_size = workload_size;
        self.started_at = Some(Instant::now());
    }

    /// Update the screen with new progress data
    pub fn update_progress(&mut self, progress: ProgressUpdate) {
        self.total_units = progress.total_units;
        self.current_progress = Some(progress);
    }

    /// Units finished so far
    pub fn completed_units(&self) -> usize {
        self.current_progress
            .as_ref()
            .map(|p| p.completed_units)
            .unwrap_or(0)
    }

    /// Completion ratio between 0.0 and 1.0
    pub fn completion(&self) -> f64 {
        self.current_progress
            .as_ref()
            .map(|p| p.completion_percentage())
            .unwrap_or(0.0)
    }

    fn elapsed(&self) -> Duration {
        self.started_at.map(|s| s.elapsed()).unwrap_or_default()
    }

    /// Render the running screen
    pub fn render(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(5), // Progress bar
                Constraint::Min(6),    // Details
                Constraint::Length(3), // Help text
            ])
            .split(size);

        let title = Paragraph::new("Benchmark - Running")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
        f.render_widget(title, chunks[0]);

        self.render_progress_bar(f, chunks[1]);
        self.render_details(f, chunks[2]);

        let help = Paragraph::new("Waiting for all units to finish...  Q quits")
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            );
        f.render_widget(help, chunks[3]);
    }

    fn render_progress_bar(&self, f: &mut Frame, area: Rect) {
        let ratio = self.completion();
        let label = format!(
            "{} / {} units | Elapsed: {}",
            self.completed_units(),
            self.total_units,
            format_duration(self.elapsed())
        );

        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title("Progress")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(label);

        f.render_widget(gauge, area);
    }

    fn render_details(&self, f: &mut Frame, area: Rect) {
        let units = self.total_units.to_string();
        let workload = format_iterations(self.workload_size);
        let total = format_iterations(self.workload_size.saturating_mul(self.total_units as u64));

        let rows = vec![
            Row::new(vec!["Parallel Units:", units.as_str()]),
            Row::new(vec!["Iterations / Unit:", workload.as_str()]),
            Row::new(vec!["Total Iterations:", total.as_str()]),
        ];

        let table = Table::new(rows, [Constraint::Length(20), Constraint::Min(20)])
            .block(
                Block::default()
                    .title("Workload")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .column_spacing(2);

        f.render_widget(table, area);
    }
}
