//! # Document Patcher
//!
//! Owns the region of a document between a start and an end marker and
//! replaces everything inside it with a freshly rendered table. Text outside
//! the markers is never touched.

use crate::config::DocumentConfig;
use crate::error::{BenchdocError, Result};
use std::fmt;
use std::fs;
use std::path::Path;

/// Which marker could not be located
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingMarker {
    Start,
    /// No end marker after the first start marker
    End,
}

impl fmt::Display for MissingMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingMarker::Start => write!(f, "start"),
            MissingMarker::End => write!(f, "end"),
        }
    }
}

/// Result of splicing a table into document content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpliceOutcome {
    Replaced(String),
    MarkersMissing(MissingMarker),
}

impl SpliceOutcome {
    pub fn is_replaced(&self) -> bool {
        matches!(self, SpliceOutcome::Replaced(_))
    }
}

/// Replaces the marker-delimited region of a document
#[derive(Debug, Clone)]
pub struct DocumentPatcher {
    start_marker: String,
    end_marker: String,
    strict: bool,
}

impl DocumentPatcher {
    pub fn new(start_marker: impl Into<String>, end_marker: impl Into<String>) -> Self {
        Self {
            start_marker: start_marker.into(),
            end_marker: end_marker.into(),
            strict: false,
        }
    }

    pub fn from_config(config: &DocumentConfig) -> Self {
        Self::new(config.start_marker.as_str(), config.end_marker.as_str())
            .with_strict_markers(config.strict_markers)
    }

    /// Fail in [`patch_file`](Self::patch_file) when a marker is missing
    pub fn with_strict_markers(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Replace the first `start ... end` span of `content` with `table`.
    ///
    /// The markers are kept and the table sits on its own lines between them.
    pub fn splice(&self, content: &str, table: &str) -> SpliceOutcome {
        let Some(start) = content.find(&self.start_marker) else {
            return SpliceOutcome::MarkersMissing(MissingMarker::Start);
        };

        let region_start = start + self.start_marker.len();
        let Some(end_offset) = content[region_start..].find(&self.end_marker) else {
            return SpliceOutcome::MarkersMissing(MissingMarker::End);
        };
        let end = region_start + end_offset + self.end_marker.len();

        let mut patched = String::with_capacity(content.len() + table.len());
        patched.push_str(&content[..start]);
        patched.push_str(&self.start_marker);
        patched.push('\n');
        patched.push_str(table);
        patched.push('\n');
        patched.push_str(&self.end_marker);
        patched.push_str(&content[end..]);

        SpliceOutcome::Replaced(patched)
    }

    /// Read `path`, splice `table` into it and write it back in place.
    ///
    /// The document must already exist. With missing markers the content is
    /// written back unchanged, or rejected when strict markers are enabled.
    pub fn patch_file(&self, path: &Path, table: &str) -> Result<SpliceOutcome> {
        let content = fs::read_to_string(path).map_err(|source| BenchdocError::Document {
            path: path.to_path_buf(),
            source,
        })?;

        let outcome = self.splice(&content, table);
        let new_content = match &outcome {
            SpliceOutcome::Replaced(patched) => patched.as_str(),
            SpliceOutcome::MarkersMissing(missing) => {
                if self.strict {
                    return Err(BenchdocError::MarkersMissing {
                        path: path.to_path_buf(),
                        missing: *missing,
                    });
                }
                tracing::warn!(
                    path = %path.display(),
                    missing = %missing,
                    start_marker = %self.start_marker,
                    end_marker = %self.end_marker,
                    "Benchmark markers not found, document left unchanged"
                );
                content.as_str()
            }
        };

        fs::write(path, new_content).map_err(|source| BenchdocError::Document {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(
            path = %path.display(),
            replaced = outcome.is_replaced(),
            "Document written"
        );

        Ok(outcome)
    }
}

impl Default for DocumentPatcher {
    fn default() -> Self {
        Self::from_config(&DocumentConfig::default())
    }
}
