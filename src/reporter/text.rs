//! Plain text reporter: one token per line.

use super::Reporter;
use crate::models::FileOutcome;

/// Text format reporter for terminal output.
pub struct TextReporter {
    /// Print a header line before each file
    show_headers: bool,
}

impl TextReporter {
    /// Create a new text reporter.
    pub fn new() -> Self {
        Self { show_headers: true }
    }

    /// Disable per-file headers.
    pub fn without_headers(mut self) -> Self {
        self.show_headers = false;
        self
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TextReporter {
    fn generate(&self, outcomes: &[FileOutcome]) -> String {
        let mut output = String::new();

        for outcome in outcomes {
            match outcome {
                FileOutcome::Processed(file) => {
                    if self.show_headers {
                        output.push_str(&format!(
                            "==> {} ({}, {} tokens)\n",
                            file.path.display(),
                            file.dialect,
                            file.tokens.len()
                        ));
                    }
                    for token in &file.tokens {
                        output.push_str(token.as_str());
                        output.push('\n');
                    }
                }
                FileOutcome::Failed { path, error } => {
                    output.push_str(&format!("==> {} failed: {}\n", path.display(), error));
                }
            }
        }

        output
    }
}
