//! Comparison chart model
//!
//! Turns a reference table and an optional measured score into the bars
//! the results screen and plain mode draw. Rendering lives with the
//! screens; this module only decides what is drawn.

use crate::models::reference::ReferenceTable;
use crate::MEASURED_LABEL;

/// Headroom above the tallest bar, as a fraction (6/5 = 120%)
const AXIS_HEADROOM: (u64, u64) = (6, 5);

/// Chart title
pub const CHART_TITLE: &str = "CPU Performance Comparison";

/// Category of a bar, used for colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarKind {
    /// Reference processor
    Reference,
    /// Reference processor from a competing vendor
    Competitor,
    /// The score measured on this machine
    Measured,
}

impl BarKind {
    /// Classify a reference label
    pub fn for_reference(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("ryzen") || lower.contains("amd") {
            BarKind::Competitor
        } else {
            BarKind::Reference
        }
    }
}

/// One bar of the chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartBar {
    pub label: String,
    pub value: u64,
    pub kind: BarKind,
}

/// Bars in display order plus the axis ceiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonChart {
    bars: Vec<ChartBar>,
    axis_max: u64,
    cpu_name: String,
}

impl ComparisonChart {
    /// Build the chart: reference bars in table order, then the measured bar
    pub fn build(references: &ReferenceTable, measured: Option<u64>, cpu_name: &str) -> Self {
        let mut bars: Vec<ChartBar> = references
            .entries()
            .iter()
            .map(|entry| ChartBar {
                label: entry.label.clone(),
                value: entry.score,
                kind: BarKind::for_reference(&entry.label),
            })
            .collect();

        if let Some(score) = measured {
            bars.push(ChartBar {
                label: MEASURED_LABEL.to_string(),
                value: score,
                kind: BarKind::Measured,
            });
        }

        let tallest = bars.iter().map(|b| b.value).max().unwrap_or(0);
        let (num, den) = AXIS_HEADROOM;
        let axis_max = tallest.saturating_mul(num).div_ceil(den);

        Self {
            bars,
            axis_max,
            cpu_name: cpu_name.to_string(),
        }
    }

    pub fn bars(&self) -> &[ChartBar] {
        &self.bars
    }

    /// Upper bound of the value axis
    pub fn axis_max(&self) -> u64 {
        self.axis_max
    }

    pub fn title(&self) -> &'static str {
        CHART_TITLE
    }

    pub fn subtitle(&self) -> String {
        format!("{}: {}", MEASURED_LABEL, self.cpu_name)
    }

    pub fn measured(&self) -> Option<&ChartBar> {
        self.bars.iter().find(|b| b.kind == BarKind::Measured)
    }

    /// Render as horizontal text bars no wider than `width` cells
    pub fn to_text(&self, width: usize) -> String {
        let label_width = self.bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
        let mut out = format!("{}\n{}\n\n", self.title(), self.subtitle());

        for bar in &self.bars {
            let cells = if self.axis_max == 0 {
                0
            } else {
                ((bar.value as f64 / self.axis_max as f64) * width as f64).round() as usize
            };
            let glyph = match bar.kind {
                BarKind::Measured => '█',
                BarKind::Competitor => '▓',
                BarKind::Reference => '░',
            };
            out.push_str(&format!(
                "{:<label_width$} │{} {}\n",
                bar.label,
                glyph.to_string().repeat(cells),
                crate::util::units::format_score(bar.value),
                label_width = label_width
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reference::ReferenceEntry;

    #[test]
    fn test_reference_bars_keep_table_order() {
        let chart = ComparisonChart::build(&ReferenceTable::default(), None, "Test CPU");
        let labels: Vec<&str> = chart.bars().iter().map(|b| b.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Intel Core i5-12600K",
                "Intel Core i7-13700K",
                "Intel Core i9-13900K",
                "Ryzen 5 7600X",
                "Ryzen 7 7700X",
            ]
        );
        assert!(chart.measured().is_none());
    }

    #[test]
    fn test_measured_bar_is_last() {
        let chart = ComparisonChart::build(&ReferenceTable::default(), Some(18_500), "Test CPU");
        let last = chart.bars().last().unwrap();
        assert_eq!(last.label, MEASURED_LABEL);
        assert_eq!(last.value, 18_500);
        assert_eq!(last.kind, BarKind::Measured);
    }

    #[test]
    fn test_bar_kinds() {
        let chart = ComparisonChart::build(&ReferenceTable::default(), Some(1), "Test CPU");
        let kinds: Vec<BarKind> = chart.bars().iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BarKind::Reference,
                BarKind::Reference,
                BarKind::Reference,
                BarKind::Competitor,
                BarKind::Competitor,
                BarKind::Measured,
            ]
        );
    }

    #[test]
    fn test_axis_leaves_headroom_over_reference_max() {
        let chart = ComparisonChart::build(&ReferenceTable::default(), Some(10_000), "Test CPU");
        assert_eq!(chart.axis_max(), 24_000);
    }

    #[test]
    fn test_axis_follows_fast_measurement() {
        let chart = ComparisonChart::build(&ReferenceTable::default(), Some(80_000), "Test CPU");
        assert_eq!(chart.axis_max(), 96_000);
    }

    #[test]
    fn test_subtitle_names_the_cpu() {
        let chart = ComparisonChart::build(&ReferenceTable::default(), None, "Apple M2");
        assert_eq!(chart.title(), "CPU Performance Comparison");
        assert_eq!(chart.subtitle(), "Your CPU: Apple M2");
    }

    #[test]
    fn test_text_rendering() {
        let table = ReferenceTable::new(vec![ReferenceEntry::new("Ref", 10_000)]).unwrap();
        let chart = ComparisonChart::build(&table, Some(5_000), "Test CPU");
        let text = chart.to_text(24);
        // axis max is 12_000, so 10_000 fills 20 of 24 cells and 5_000 fills 10
        assert!(text.contains(&format!("Ref      │{} 10,000", "░".repeat(20))));
        assert!(text.contains(&format!("Your CPU │{} 5,000", "█".repeat(10))));
    }
}
