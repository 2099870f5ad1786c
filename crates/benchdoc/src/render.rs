//! Markdown table rendering

use crate::config::TableConfig;
use crate::parser::BenchmarkReport;

/// Renders a [`BenchmarkReport`] as a two-column Markdown table
#[derive(Debug, Clone, Default)]
pub struct TableRenderer {
    config: TableConfig,
}

impl TableRenderer {
    pub fn new(config: TableConfig) -> Self {
        Self { config }
    }

    /// Header, separator, one row per entry and a bold total row.
    ///
    /// Cells are copied verbatim and the result has no trailing newline.
    pub fn render(&self, report: &BenchmarkReport) -> String {
        let config = &self.config;
        let mut lines = Vec::with_capacity(report.entries.len() + 3);

        lines.push(format!(
            "| {} | {} |",
            config.label_header, config.time_header
        ));
        lines.push("| --- | --- |".to_string());

        for entry in &report.entries {
            let duration = entry.duration.as_deref().unwrap_or(&config.missing_time);
            lines.push(format!("| {} | {} |", entry.label, duration));
        }

        let total = report.total.as_deref().unwrap_or(&config.missing_total);
        lines.push(format!("| **{}** | **{}** |", config.total_label, total));

        lines.join("\n")
    }
}
