//! Results screen implementation
//!
//! Draws the comparison bar chart for the last run next to a summary of
//! the measurement, or the error if the run failed.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Row, Table},
    Frame,
};

use crate::models::{BarKind, BenchmarkResult, ComparisonChart, ReferenceTable};
use crate::util::units::{format_duration, format_iterations, format_score};
use crate::{error, CpuOrbError};

/// Orange used for competitor bars
const COMPETITOR_COLOR: Color = Color::Rgb(255, 165, 0);

/// Bar colour for a chart category
pub fn bar_color(kind: BarKind) -> Color {
    match kind {
        BarKind::Reference => Color::Gray,
        BarKind::Competitor => COMPETITOR_COLOR,
        BarKind::Measured => Color::Blue,
    }
}

/// Available actions on the results screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultAction {
    RunAgain,
    Back,
}

impl ResultAction {
    /// Get all available actions
    pub fn all() -> [Self; 2] {
        [Self::RunAgain, Self::Back]
    }

    /// Get display text for the action
    pub fn display_text(&self) -> &'static str {
        match self {
            Self::RunAgain => "Run Again",
            Self::Back => "Back to Menu",
        }
    }
}

/// How the last run ended
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(BenchmarkResult),
    Failed(String),
}

/// Results screen component
#[derive(Debug)]
pub struct ResultsScreen {
    references: ReferenceTable,
    cpu_name: String,
    outcome: Option<RunOutcome>,
    chart: ComparisonChart,
    selected_action: ResultAction,
}

impl ResultsScreen {
    /// Create a new results screen for the given reference table
    pub fn new(references: ReferenceTable, cpu_name: impl Into<String>) -> Self {
        let cpu_name = cpu_name.into();
        let chart = ComparisonChart::build(&references, None, &cpu_name);

        Self {
            references,
            cpu_name,
            outcome: None,
            chart,
            selected_action: ResultAction::RunAgain,
        }
    }

    /// Record a successful run
    pub fn set_result(&mut self, result: BenchmarkResult) {
        self.chart = ComparisonChart::build(&self.references, Some(result.score), &self.cpu_name);
        self.outcome = Some(RunOutcome::Completed(result));
    }

    /// Record a failed run
    pub fn set_error(&mut self, err: &CpuOrbError) {
        self.chart = ComparisonChart::build(&self.references, None, &self.cpu_name);
        self.outcome = Some(RunOutcome::Failed(error::user_friendly_message(err)));
    }

    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    pub fn chart(&self) -> &ComparisonChart {
        &self.chart
    }

    /// Get the current result, if the last run succeeded
    pub fn result(&self) -> Option<&BenchmarkResult> {
        match &self.outcome {
            Some(RunOutcome::Completed(result)) => Some(result),
            _ => None,
        }
    }

    pub fn selected_action(&self) -> ResultAction {
        self.selected_action
    }

    /// Select next action
    pub fn select_next_action(&mut self) {
        let actions = ResultAction::all();
        let current = actions.iter().position(|a| *a == self.selected_action).unwrap_or(0);
        self.selected_action = actions[(current + 1) % actions.len()];
    }

    /// Select previous action
    pub fn select_previous_action(&mut self) {
        let actions = ResultAction::all();
        let current = actions.iter().position(|a| *a == self.selected_action).unwrap_or(0);
        self.selected_action = actions[(current + actions.len() - 1) % actions.len()];
    }

    /// Render the results screen
    pub fn render(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(10),   // Chart and summary
                Constraint::Length(3), // Actions
                Constraint::Length(3), // Help text
            ])
            .split(size);

        self.render_title(f, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[1]);

        self.render_chart(f, body[0]);
        self.render_summary(f, body[1]);
        self.render_actions(f, chunks[2]);
        self.render_help(f, chunks[3]);
    }

    fn render_title(&self, f: &mut Frame, area: Rect) {
        let failed = matches!(self.outcome, Some(RunOutcome::Failed(_)));
        let (text, color) = if failed {
            ("Benchmark - Failed", Color::Red)
        } else {
            (self.chart.title(), Color::Cyan)
        };

        let title = Paragraph::new(text)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );

        f.render_widget(title, area);
    }

    fn render_chart(&self, f: &mut Frame, area: Rect) {
        let bars: Vec<Bar> = self
            .chart
            .bars()
            .iter()
            .map(|bar| {
                let color = bar_color(bar.kind);
                Bar::default()
                    .label(Line::from(bar.label.clone()))
                    .value(bar.value)
                    .text_value(format_score(bar.value))
                    .style(Style::default().fg(color))
                    .value_style(Style::default().fg(Color::Black).bg(color))
            })
            .collect();

        let chart = BarChart::default()
            .block(
                Block::default()
                    .title(self.chart.subtitle())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(1)
            .max(self.chart.axis_max())
            .data(BarGroup::default().bars(&bars));

        f.render_widget(chart, area);
    }

    fn render_summary(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Summary")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        match &self.outcome {
            Some(RunOutcome::Completed(result)) => {
                let score = format_score(result.score);
                let duration = format_duration(result.duration);
                let units = result.processing_units.to_string();
                let workload = format_iterations(result.workload_size);
                let checksum = format!("{:.3e}", result.checksum);
                let timestamp = result.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string();

                let rows = vec![
                    Row::new(vec!["Score:", score.as_str()]).style(
                        Style::default()
                            .fg(bar_color(BarKind::Measured))
                            .add_modifier(Modifier::BOLD),
                    ),
                    Row::new(vec!["Duration:", duration.as_str()]),
                    Row::new(vec!["Units:", units.as_str()]),
                    Row::new(vec!["Iterations:", workload.as_str()]),
                    Row::new(vec!["Checksum:", checksum.as_str()]),
                    Row::new(vec!["Finished:", timestamp.as_str()]),
                    Row::new(vec!["OS:", result.system_info.os.as_str()]),
                ];

                let table = Table::new(rows, [Constraint::Length(12), Constraint::Min(10)])
                    .block(block)
                    .column_spacing(1);
                f.render_widget(table, area);
            }
            Some(RunOutcome::Failed(message)) => {
                let text = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "Error occurred:",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(message.as_str(), Style::default().fg(Color::Red))),
                ];
                let paragraph = Paragraph::new(text)
                    .block(block)
                    .wrap(ratatui::widgets::Wrap { trim: true });
                f.render_widget(paragraph, area);
            }
            None => {
                let paragraph = Paragraph::new("Run a benchmark first to see results here.")
                    .alignment(Alignment::Center)
                    .block(block);
                f.render_widget(paragraph, area);
            }
        }
    }

    fn render_actions(&self, f: &mut Frame, area: Rect) {
        let actions_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(40),
                Constraint::Min(0),
            ])
            .split(area)[1];

        let action_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(actions_area);

        for (action, chunk) in ResultAction::all().iter().zip(action_chunks.iter()) {
            let selected = *action == self.selected_action;
            let style = if selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let button = Paragraph::new(action.display_text())
                .style(style)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).border_style(if selected {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::White)
                }));

            f.render_widget(button, *chunk);
        }
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let help_text = vec![Line::from(vec![
            Span::styled("←→", key),
            Span::raw(" Choose  "),
            Span::styled("Enter", key),
            Span::raw(" Confirm  "),
            Span::styled("R", key),
            Span::raw(" Run  "),
            Span::styled("Esc", key),
            Span::raw(" Menu  "),
            Span::styled("Q", key),
            Span::raw(" Quit"),
        ])];

        let help = Paragraph::new(help_text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );

        f.render_widget(help, area);
    }
}
