//! token_prep - Source preparation for token-level language models
//!
//! Turns raw TypeScript source into a normalized, anonymized token stream
//! suitable for building a training vocabulary.
//!
//! # Pipeline
//!
//! - **Filter**: strips `//` comments and `import` lines, trims the text
//! - **Anonymizer**: tree-sitter based two-pass rewrite of declared names
//!   into role placeholders (`_class_`, `_property0_`, `_function_`,
//!   `_method_`, `_variable0_`)
//! - **Lexer**: splits the result into string literals, name/number runs,
//!   and single punctuation characters
//!
//! Each file is processed independently; batches run on a Rayon pool.
//!
//! # Example Usage
//!
//! ```no_run
//! use token_prep::{Config, Preprocessor};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let preprocessor = Preprocessor::new(Config::default())?;
//!
//!     let tokens = preprocessor.process("class Point { x = 1; }")?;
//!     println!("{} tokens", tokens.len());
//!
//!     Ok(())
//! }
//! ```

pub mod anonymizer;
pub mod config;
pub mod error;
pub mod filter;
pub mod lexer;
pub mod models;
pub mod reporter;

// Re-export commonly used types
pub use anonymizer::{anonymize, Anonymizer, NormalizationPass};
pub use config::{Config, OutputFormat};
pub use error::{PrepError, Result};
pub use filter::{filter, Filter};
pub use lexer::tokenize;
pub use models::{Dialect, FileOutcome, ProcessedFile, Replacement, SourceFile, Token};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Pipeline orchestrating filter, anonymizer and lexer.
pub struct Preprocessor {
    /// Configuration
    config: Config,

    /// Comment and import stripper
    filter: Filter,

    /// Declaration anonymizer
    anonymizer: Anonymizer,

    /// Worker pool for batches of files
    pool: rayon::ThreadPool,
}

impl Preprocessor {
    /// Create a new preprocessor with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        let filter = Filter::new(&config.filter)?;
        let anonymizer = Anonymizer::with_config(config.anonymizer.clone());

        let threads = config.concurrency.effective_threads();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|idx| format!("prep-worker-{}", idx))
            .build()?;

        debug!(
            "Preprocessor initialized: {} worker threads, passes {:?}",
            threads,
            anonymizer.passes()
        );

        Ok(Self {
            config,
            filter,
            anonymizer,
            pool,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run only the filter stage.
    pub fn filter_text(&self, text: &str) -> String {
        self.filter.apply(text)
    }

    /// Run the filter and anonymizer stages.
    pub fn anonymize_text(&self, text: &str, dialect: Dialect) -> Result<String> {
        let filtered = self.filter.apply(text);
        self.anonymizer.anonymize_as(&filtered, dialect)
    }

    /// Run the full pipeline in the configured dialect.
    pub fn process(&self, text: &str) -> Result<Vec<Token>> {
        self.process_as(text, self.config.anonymizer.dialect)
    }

    /// Run the full pipeline, parsing as `dialect`.
    pub fn process_as(&self, text: &str, dialect: Dialect) -> Result<Vec<Token>> {
        let anonymized = self.anonymize_text(text, dialect)?;
        Ok(tokenize(&anonymized))
    }

    /// Read and process one file.
    ///
    /// The dialect comes from the file extension, falling back to the
    /// configured default.
    pub fn process_file(&self, path: &Path) -> Result<ProcessedFile> {
        let start_time = Instant::now();
        let mut source = SourceFile::open(path, self.config.anonymizer.dialect)?;

        let limit = self.config.anonymizer.max_file_size;
        if source.size > limit {
            return Err(PrepError::FileTooLarge {
                size: source.size,
                limit,
            });
        }

        let dialect = source.dialect;
        let content = source.load_content()?;
        let tokens = self.process_as(content, dialect)?;

        info!(
            "Processed {} ({}): {} tokens in {}ms",
            path.display(),
            dialect,
            tokens.len(),
            start_time.elapsed().as_millis()
        );

        Ok(ProcessedFile {
            path: path.to_path_buf(),
            dialect,
            tokens,
        })
    }

    /// Process files in parallel.
    ///
    /// Outcomes are returned in input order. A failing file is reported in
    /// its own outcome and does not stop the rest of the batch.
    pub fn process_files(&self, paths: &[PathBuf]) -> Vec<FileOutcome> {
        info!("Processing {} files", paths.len());

        self.pool.install(|| {
            paths
                .par_iter()
                .map(|path| match self.process_file(path) {
                    Ok(file) => FileOutcome::Processed(file),
                    Err(e) => {
                        warn!("Skipping {}: {}", path.display(), e);
                        FileOutcome::Failed {
                            path: path.clone(),
                            error: e.to_string(),
                        }
                    }
                })
                .collect()
        })
    }
}

/// Run the full pipeline on TypeScript `text` with default configuration.
pub fn preprocess(text: &str) -> Result<Vec<Token>> {
    let filtered = filter(text)?;
    let anonymized = anonymize(&filtered)?;
    Ok(tokenize(&anonymized))
}
