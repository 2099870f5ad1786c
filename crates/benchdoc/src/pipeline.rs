//! # Update Pipeline
//!
//! Wires the four stages together: run the benchmark command, parse its
//! output, render the table and splice it into the document.

use crate::config::BenchdocConfig;
use crate::error::Result;
use crate::parser::{BenchmarkReport, ReportParser};
use crate::patcher::DocumentPatcher;
use crate::render::TableRenderer;
use crate::runner::BenchmarkRunner;
use serde::Serialize;
use std::path::PathBuf;

/// What a single update produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateSummary {
    pub report: BenchmarkReport,
    /// Total as rendered, placeholder included
    pub total: String,
    pub table: String,
    pub document: PathBuf,
    /// False for dry runs and when the markers were missing
    pub replaced: bool,
}

/// Refreshes the benchmark table of one document
#[derive(Debug, Clone)]
pub struct ReadmeUpdater {
    runner: BenchmarkRunner,
    parser: ReportParser,
    renderer: TableRenderer,
    patcher: DocumentPatcher,
    document: PathBuf,
    missing_total: String,
    show_progress: bool,
}

impl ReadmeUpdater {
    pub fn from_config(config: &BenchdocConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            runner: BenchmarkRunner::from_config(&config.command),
            parser: ReportParser::new(&config.parser)?,
            renderer: TableRenderer::new(config.table.clone()),
            patcher: DocumentPatcher::from_config(&config.document),
            document: config.document.path.clone(),
            missing_total: config.table.missing_total.clone(),
            show_progress: true,
        })
    }

    /// Print progress lines to stdout (on by default)
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.show_progress = progress;
        self
    }

    /// Run the benchmark command and update the document
    pub fn run(&self) -> Result<UpdateSummary> {
        self.progress("Running benchmarks...");
        let output = self.runner.run()?;
        self.update_from_output(&output)
    }

    /// Run the benchmark command and render the table without writing
    pub fn run_dry(&self) -> Result<UpdateSummary> {
        self.progress("Running benchmarks...");
        let output = self.runner.run()?;
        Ok(self.preview(&output))
    }

    /// Update the document from already captured benchmark output
    pub fn update_from_output(&self, output: &str) -> Result<UpdateSummary> {
        let mut summary = self.preview(output);

        self.progress("Updating README...");
        let outcome = self.patcher.patch_file(&self.document, &summary.table)?;
        summary.replaced = outcome.is_replaced();

        self.progress("Done.");
        Ok(summary)
    }

    /// Parse and render without touching the document
    pub fn preview(&self, output: &str) -> UpdateSummary {
        self.progress("Parsing results...");
        let report = self.parser.parse(output);
        let total = report
            .total
            .clone()
            .unwrap_or_else(|| self.missing_total.clone());

        self.progress(&format!(
            "Found {} days. Total time: {}",
            report.entries.len(),
            total
        ));

        let table = self.renderer.render(&report);

        UpdateSummary {
            report,
            total,
            table,
            document: self.document.clone(),
            replaced: false,
        }
    }

    fn progress(&self, message: &str) {
        if self.show_progress {
            println!("{}", message);
        }
    }
}
