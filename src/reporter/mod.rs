//! Reporting module for outputting token streams.

mod text;

pub use text::*;

use crate::config::OutputFormat;
use crate::models::FileOutcome;

/// Report generator trait.
pub trait Reporter {
    /// Generate a report from per-file outcomes.
    fn generate(&self, outcomes: &[FileOutcome]) -> String;
}

/// Create a reporter based on output format.
pub fn create_reporter(format: OutputFormat) -> Box<dyn Reporter> {
    match format {
        OutputFormat::Json => Box::new(JsonReporter::new()),
        OutputFormat::Text => Box::new(TextReporter::new()),
    }
}

/// JSON reporter emitting an array of per-file objects.
pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for JsonReporter {
    fn generate(&self, outcomes: &[FileOutcome]) -> String {
        serde_json::to_string_pretty(outcomes).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}
