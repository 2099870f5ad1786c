//! # Configuration
//!
//! Every field has a default that reproduces the stock behavior: run
//! `cargo run --release`, read `Day NN:` blocks and splice the table into
//! `README.md`. A TOML file only needs to name the fields it changes.

use crate::error::{BenchdocError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchdocConfig {
    pub command: CommandConfig,
    pub parser: ParserConfig,
    pub table: TableConfig,
    pub document: DocumentConfig,
}

/// External benchmark command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    /// Kill the command after this long; unset waits forever
    #[serde(with = "humantime_opt")]
    pub timeout: Option<Duration>,
    /// Mirror child stdout while capturing it
    pub echo: bool,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            program: "cargo".to_string(),
            args: vec!["run".to_string(), "--release".to_string()],
            working_dir: None,
            timeout: None,
            echo: false,
        }
    }
}

/// Literal prefixes recognised in benchmark output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub entry_prefix: String,
    pub time_prefix: String,
    pub total_prefix: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            entry_prefix: "Day ".to_string(),
            time_prefix: "Time:".to_string(),
            total_prefix: "Total time: ".to_string(),
        }
    }
}

/// Table headings and placeholder text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub label_header: String,
    pub time_header: String,
    pub total_label: String,
    pub missing_time: String,
    pub missing_total: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            label_header: "Day".to_string(),
            time_header: "Time".to_string(),
            total_label: "Total".to_string(),
            missing_time: "N/A".to_string(),
            missing_total: "0ms".to_string(),
        }
    }
}

/// Target document and the markers delimiting the owned region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub path: PathBuf,
    pub start_marker: String,
    pub end_marker: String,
    /// Fail instead of warning when a marker is missing
    pub strict_markers: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("README.md"),
            start_marker: "<!-- benchmarks-start -->".to_string(),
            end_marker: "<!-- benchmarks-end -->".to_string(),
            strict_markers: false,
        }
    }
}

impl BenchdocConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BenchdocError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::load_from_toml(&content)
    }

    /// Load configuration from TOML string
    pub fn load_from_toml(toml_content: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_content)
            .map_err(|e| BenchdocError::Config(format!("Failed to parse TOML config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pipeline cannot act on
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("command.program", &self.command.program),
            ("parser.entry_prefix", &self.parser.entry_prefix),
            ("parser.time_prefix", &self.parser.time_prefix),
            ("parser.total_prefix", &self.parser.total_prefix),
            ("document.start_marker", &self.document.start_marker),
            ("document.end_marker", &self.document.end_marker),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(BenchdocError::Config(format!("{} must not be empty", field)));
            }
        }

        if self.document.start_marker == self.document.end_marker {
            return Err(BenchdocError::Config(
                "document.start_marker and document.end_marker must differ".to_string(),
            ));
        }

        if self.command.timeout == Some(Duration::ZERO) {
            return Err(BenchdocError::Config(
                "command.timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Optional durations written in humantime syntax, e.g. `"10m"` or `"1h 30m"`
mod humantime_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => {
                serializer.serialize_str(&humantime::format_duration(*duration).to_string())
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|text| humantime::parse_duration(&text).map_err(serde::de::Error::custom))
            .transpose()
    }
}
