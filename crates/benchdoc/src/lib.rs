//! # Benchdoc
//!
//! Keeps the benchmark table in a README in sync with the timings printed by
//! a solutions binary.
//!
//! ## Pipeline
//!
//! - **Runner**: runs the benchmark command (`cargo run --release` by default)
//!   and captures stdout
//! - **Parser**: extracts `Day NN:` entries, their `Time:` lines and the
//!   overall `Total time:`
//! - **Renderer**: builds a two-column Markdown table
//! - **Patcher**: replaces the region between `<!-- benchmarks-start -->` and
//!   `<!-- benchmarks-end -->` in the document
//!
//! ## Usage
//!
//! ```rust
//! use benchdoc::{BenchdocConfig, ReportParser, TableRenderer};
//!
//! let config = BenchdocConfig::default();
//! let parser = ReportParser::new(&config.parser).unwrap();
//! let report = parser.parse("Day 01:\nTime: 10ms\nTotal time: 10ms\n");
//!
//! let table = TableRenderer::new(config.table).render(&report);
//! assert!(table.ends_with("| **Total** | **10ms** |"));
//! ```

/// Configuration file support
pub mod config;
/// Error types
pub mod error;
/// Benchmark output parsing
pub mod parser;
/// Marker-delimited document patching
pub mod patcher;
/// End-to-end update workflow
pub mod pipeline;
/// Markdown table rendering
pub mod render;
/// External benchmark command execution
pub mod runner;

pub use config::{BenchdocConfig, CommandConfig, DocumentConfig, ParserConfig, TableConfig};
pub use error::{BenchdocError, Result};
pub use parser::{BenchmarkEntry, BenchmarkReport, ReportParser};
pub use patcher::{DocumentPatcher, MissingMarker, SpliceOutcome};
pub use pipeline::{ReadmeUpdater, UpdateSummary};
pub use render::TableRenderer;
pub use runner::BenchmarkRunner;
