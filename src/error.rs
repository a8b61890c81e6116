//! Error types for the token preparation pipeline.

use thiserror::Error;

/// Main error type for the preparation pipeline.
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("Tree-sitter parsing error: {0}")]
    Parse(String),

    #[error("Overlapping replacements: [{first_start}, {first_end}) and [{second_start}, {second_end})")]
    OverlappingReplacements {
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },

    #[error("Invalid replacement range [{start}, {end}) for text of length {len}")]
    InvalidReplacement { start: usize, end: usize, len: usize },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: u64, limit: u64 },
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PrepError>;

impl From<rayon::ThreadPoolBuildError> for PrepError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        PrepError::Config(format!("Failed to build worker pool: {}", err))
    }
}
