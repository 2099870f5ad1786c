//! # Benchmark Output Parser
//!
//! Extracts per-entry timings and the overall total from the textual output
//! of a benchmark run, for example:
//!
//! ```text
//! Day 01:
//! Part 1: 1034
//! Part 2: 6166
//! Time: 312µs
//! Day 02:
//! ...
//! Total time: 4ms
//! ```
//!
//! Parsing never fails. Chunks whose label is not numeric are dropped, and
//! missing timings are reported as `None` so the renderer can pick a placeholder.

use crate::config::ParserConfig;
use crate::error::{BenchdocError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One benchmarked unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    pub label: String,
    /// Duration exactly as printed, e.g. `"123µs"`
    pub duration: Option<String>,
}

impl BenchmarkEntry {
    pub fn new(label: impl Into<String>, duration: Option<&str>) -> Self {
        Self {
            label: label.into(),
            duration: duration.map(str::to_string),
        }
    }
}

/// Everything extracted from one benchmark run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Entries in the order they appeared in the output
    pub entries: Vec<BenchmarkEntry>,
    pub total: Option<String>,
}

/// Parser for `Day NN:` style benchmark output
#[derive(Debug, Clone)]
pub struct ReportParser {
    entry_prefix: String,
    time_prefix: String,
    total_pattern: Regex,
}

impl ReportParser {
    pub fn new(config: &ParserConfig) -> Result<Self> {
        let total_pattern = Regex::new(&format!("{}(.+)", regex::escape(&config.total_prefix)))
            .map_err(|e| BenchdocError::Config(format!("Invalid total prefix: {}", e)))?;

        Ok(Self {
            entry_prefix: config.entry_prefix.clone(),
            time_prefix: config.time_prefix.clone(),
            total_pattern,
        })
    }

    /// Parse complete benchmark output
    pub fn parse(&self, output: &str) -> BenchmarkReport {
        let entries = output
            .split(self.entry_prefix.as_str())
            .filter_map(|chunk| self.parse_chunk(chunk))
            .collect();

        BenchmarkReport {
            entries,
            total: self.parse_total(output),
        }
    }

    /// Parse the text following one entry prefix
    fn parse_chunk(&self, chunk: &str) -> Option<BenchmarkEntry> {
        if chunk.trim().is_empty() {
            return None;
        }

        let label = chunk.lines().next()?.trim_matches(':');

        if label.is_empty() || !label.chars().all(|c| c.is_ascii_digit()) {
            tracing::debug!(label = %label, "Skipping chunk without a numeric label");
            return None;
        }

        // The label line itself may carry the time
        let duration = chunk.lines().find_map(|line| {
            line.trim()
                .strip_prefix(self.time_prefix.as_str())
                .map(|rest| rest.trim().to_string())
        });

        Some(BenchmarkEntry {
            label: label.to_string(),
            duration,
        })
    }

    /// First `Total time: ...` anywhere in the output, independent of entry chunks
    fn parse_total(&self, output: &str) -> Option<String> {
        self.total_pattern
            .captures(output)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().trim_end_matches('\r').to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_OUTPUT: &str = "\
   Compiling aoc v0.1.0 (/home/user/aoc)
    Finished `release` profile [optimized] target(s) in 4.21s
Day 01:
Part 1: 1034
Part 2: 6166
Time: 312µs
Day 02:
Part 1: 28146997880
Part 2: 40028128307
Time: 48.2ms
Day 03:
Part 1: 17443
Part 2: 172167155440541
Time: 95µs
Total time: 48.6ms
";

    fn parser() -> ReportParser {
        ReportParser::new(&ParserConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_full_output() {
        let report = parser().parse(SAMPLE_OUTPUT);

        assert_eq!(
            report.entries,
            vec![
                BenchmarkEntry::new("01", Some("312µs")),
                BenchmarkEntry::new("02", Some("48.2ms")),
                BenchmarkEntry::new("03", Some("95µs")),
            ]
        );
        assert_eq!(report.total.as_deref(), Some("48.6ms"));
    }

    #[test]
    fn test_end_to_end_example() {
        let report = parser().parse("Day 01:\nTime: 10ms\nDay 02:\nsome text\nTotal time: 15ms\n");

        assert_eq!(
            report.entries,
            vec![
                BenchmarkEntry::new("01", Some("10ms")),
                BenchmarkEntry::new("02", None),
            ]
        );
        assert_eq!(report.total.as_deref(), Some("15ms"));
    }

    #[test]
    fn test_missing_total() {
        let report = parser().parse("Day 01:\nTime: 10ms\n");
        assert_eq!(report.total, None);
    }

    #[test]
    fn test_total_strips_line_ending() {
        assert_eq!(
            parser().parse("Total time: 42ms\n").total.as_deref(),
            Some("42ms")
        );
        assert_eq!(
            parser().parse("Total time: 42ms\r\n").total.as_deref(),
            Some("42ms")
        );
    }

    #[test]
    fn test_total_found_before_entries() {
        let report = parser().parse("Total time: 7ms\nDay 01:\nTime: 3ms\n");
        assert_eq!(report.total.as_deref(), Some("7ms"));
        assert_eq!(report.entries, vec![BenchmarkEntry::new("01", Some("3ms"))]);
    }

    #[test]
    fn test_first_total_wins() {
        let report = parser().parse("Total time: 1ms\nTotal time: 2ms\n");
        assert_eq!(report.total.as_deref(), Some("1ms"));
    }

    #[test]
    fn test_empty_total_value_is_skipped() {
        let report = parser().parse("Total time: \nTotal time: 9ms\n");
        assert_eq!(report.total.as_deref(), Some("9ms"));
    }

    #[test]
    fn test_non_numeric_labels_dropped() {
        let report = parser().parse("Day one:\nTime: 1ms\nDay 02:\nTime: 2ms\nDay 3a:\nTime: 3ms\n");
        assert_eq!(report.entries, vec![BenchmarkEntry::new("02", Some("2ms"))]);
    }

    #[test]
    fn test_label_with_trailing_space_dropped() {
        let report = parser().parse("Day 01: \nTime: 1ms\n");
        assert!(report.entries.is_empty());
    }

    #[test]
    fn test_first_time_line_wins() {
        let report = parser().parse("Day 05:\n  Time:  1ms  \nTime: 2ms\n");
        assert_eq!(report.entries, vec![BenchmarkEntry::new("05", Some("1ms"))]);
    }

    #[test]
    fn test_repeated_time_prefix_stays_in_duration() {
        let report = parser().parse("Day 01:\nTime: 5ms Time: x\n");
        assert_eq!(
            report.entries,
            vec![BenchmarkEntry::new("01", Some("5ms Time: x"))]
        );
    }

    #[test]
    fn test_total_line_is_not_a_time_line() {
        let report = parser().parse("Day 09:\nTotal time: 5ms\n");
        assert_eq!(report.entries, vec![BenchmarkEntry::new("09", None)]);
        assert_eq!(report.total.as_deref(), Some("5ms"));
    }

    #[test]
    fn test_empty_output() {
        assert_eq!(parser().parse(""), BenchmarkReport::default());
    }

    #[test]
    fn test_malformed_output() {
        let report = parser().parse("This is not benchmark output\nno timing information here");
        assert!(report.entries.is_empty());
        assert_eq!(report.total, None);
    }

    #[test]
    fn test_custom_prefixes() {
        let config = ParserConfig {
            entry_prefix: "Puzzle ".to_string(),
            time_prefix: "elapsed=".to_string(),
            total_prefix: "ALL: ".to_string(),
        };
        let parser = ReportParser::new(&config).unwrap();
        let report = parser.parse("Puzzle 7:\nelapsed=2s\nALL: 2s (1 puzzle)\n");

        assert_eq!(report.entries, vec![BenchmarkEntry::new("7", Some("2s"))]);
        assert_eq!(report.total.as_deref(), Some("2s (1 puzzle)"));
    }

    #[test]
    fn test_total_prefix_is_literal() {
        let config = ParserConfig {
            total_prefix: "Total (all): ".to_string(),
            ..ParserConfig::default()
        };
        let parser = ReportParser::new(&config).unwrap();
        assert_eq!(
            parser.parse("Total (all): 3ms\n").total.as_deref(),
            Some("3ms")
        );
    }
}
