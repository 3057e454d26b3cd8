//! Start screen implementation
//!
//! Main menu with Run Benchmark and Quit, next to a panel describing the
//! machine that is about to be measured.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Row, Table},
    Frame,
};

use crate::models::SystemInfo;
use crate::util::units::format_iterations;

/// Entries of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartAction {
    RunBenchmark,
    Quit,
}

impl StartAction {
    pub fn all() -> [Self; 2] {
        [Self::RunBenchmark, Self::Quit]
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            Self::RunBenchmark => "Run Benchmark",
            Self::Quit => "Quit",
        }
    }
}

/// Start screen component
#[derive(Debug)]
pub struct StartScreen {
    system_info: SystemInfo,
    processing_units: usize,
    workload_size: u64,
    reference_count: usize,
    selected_index: usize,
    list_state: ListState,
}

impl StartScreen {
    /// Create a new start screen
    pub fn new(
        system_info: SystemInfo,
        processing_units: usize,
        workload_size: u64,
        reference_count: usize,
    ) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            system_info,
            processing_units,
            workload_size,
            reference_count,
            selected_index: 0,
            list_state,
        }
    }

    /// Get the currently selected menu entry
    pub fn selected_action(&self) -> StartAction {
        StartAction::all()[self.selected_index]
    }

    /// Move selection up
    pub fn select_previous(&mut self) {
        let count = StartAction::all().len();
        self.selected_index = (self.selected_index + count - 1) % count;
        self.list_state.select(Some(self.selected_index));
    }

    /// Move selection down
    pub fn select_next(&mut self) {
        self.selected_index = (self.selected_index + 1) % StartAction::all().len();
        self.list_state.select(Some(self.selected_index));
    }

    /// Update the unit count shown in the system panel
    pub fn set_processing_units(&mut self, units: usize) {
        self.processing_units = units;
    }

    /// Render the start screen
    pub fn render(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // Title and subtitle
                Constraint::Min(8),    // Menu and system panel
                Constraint::Length(3), // Help text
            ])
            .split(size);

        self.render_title(f, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);

        self.render_menu(f, body[0]);
        self.render_system(f, body[1]);
        self.render_help(f, chunks[2]);
    }

    fn render_title(&self, f: &mut Frame, area: Rect) {
        let title_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(2)])
            .split(area);

        let title = Paragraph::new("CPUORB")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
        f.render_widget(title, title_chunks[0]);

        let subtitle = Paragraph::new("CPU Benchmark Viewer")
            .style(Style::default().fg(Color::White))
            .alignment(Alignment::Center);
        f.render_widget(subtitle, title_chunks[1]);
    }

    fn render_menu(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = StartAction::all()
            .iter()
            .map(|action| ListItem::new(action.display_text()))
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Menu"))
            .highlight_style(Style::default().bg(Color::Cyan).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_system(&self, f: &mut Frame, area: Rect) {
        let units = self.processing_units.to_string();
        let workload = format!("{} iterations per unit", format_iterations(self.workload_size));
        let references = self.reference_count.to_string();

        let rows = vec![
            Row::new(vec!["CPU:", self.system_info.cpu.as_str()]),
            Row::new(vec!["System:", self.system_info.os.as_str()]),
            Row::new(vec!["Processing Units:", units.as_str()]),
            Row::new(vec!["Workload:", workload.as_str()]),
            Row::new(vec!["Reference CPUs:", references.as_str()]),
        ];

        let table = Table::new(rows, [Constraint::Length(18), Constraint::Min(20)])
            .block(
                Block::default()
                    .title("This Machine")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .column_spacing(1);

        f.render_widget(table, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let help_text = vec![Line::from(vec![
            Span::styled("↑↓", key),
            Span::raw(" Navigate  "),
            Span::styled("Enter", key),
            Span::raw(" Select  "),
            Span::styled("R", key),
            Span::raw(" Run  "),
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

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> StartScreen {
        let info = SystemInfo {
            os: "linux x86_64".to_string(),
            cpu: "Test CPU".to_string(),
        };
        StartScreen::new(info, 8, 10_000_000, 5)
    }

    #[test]
    fn test_start_screen_creation() {
        let screen = screen();
        assert_eq!(screen.selected_action(), StartAction::RunBenchmark);
        assert_eq!(screen.processing_units, 8);
    }

    #[test]
    fn test_menu_navigation_wraps() {
        let mut screen = screen();
        screen.select_next();
        assert_eq!(screen.selected_action(), StartAction::Quit);
        screen.select_next();
        assert_eq!(screen.selected_action(), StartAction::RunBenchmark);
        screen.select_previous();
        assert_eq!(screen.selected_action(), StartAction::Quit);
    }
}
