//! Per-file pipeline results.

use super::{Dialect, Token};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tokens produced for one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedFile {
    /// Path as given by the caller
    pub path: PathBuf,

    /// Dialect the file was parsed as
    pub dialect: Dialect,

    /// Token sequence in source order
    pub tokens: Vec<Token>,
}

/// Result of running the pipeline on one file of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileOutcome {
    /// The file was tokenized.
    Processed(ProcessedFile),
    /// The file was skipped; other files in the batch are unaffected.
    Failed { path: PathBuf, error: String },
}

impl FileOutcome {
    /// Path of the file this outcome describes.
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Processed(file) => &file.path,
            FileOutcome::Failed { path, .. } => path,
        }
    }

    /// Whether the file was tokenized.
    pub fn is_processed(&self) -> bool {
        matches!(self, FileOutcome::Processed(_))
    }

    /// Tokens, if the file was tokenized.
    pub fn tokens(&self) -> Option<&[Token]> {
        match self {
            FileOutcome::Processed(file) => Some(&file.tokens),
            FileOutcome::Failed { .. } => None,
        }
    }
}
