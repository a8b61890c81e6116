//! Configuration management for the preparation pipeline.

use crate::models::Dialect;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Filter configuration
    #[serde(default)]
    pub filter: FilterConfig,

    /// Anonymizer configuration
    #[serde(default)]
    pub anonymizer: AnonymizerConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Concurrency settings
    #[serde(default)]
    pub concurrency: ConcurrencyConfig,
}

/// Filter stage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Strip `//` comments to end of line
    #[serde(default = "default_true")]
    pub strip_comments: bool,

    /// Drop whole `import` lines
    #[serde(default = "default_true")]
    pub strip_imports: bool,
}

/// Anonymizer stage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizerConfig {
    /// Dialect used when a file's extension does not name one
    #[serde(default)]
    pub dialect: Dialect,

    /// Run the class-scope pass
    #[serde(default = "default_true")]
    pub class_scope: bool,

    /// Run the function/method-scope pass
    #[serde(default = "default_true")]
    pub function_scope: bool,

    /// Treat trees containing syntax errors as parse failures
    #[serde(default = "default_true")]
    pub reject_syntax_errors: bool,

    /// Maximum file size to process (in bytes)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Output file path (stdout if not specified)
    pub output_path: Option<PathBuf>,
}

/// Concurrency configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcurrencyConfig {
    /// Number of worker threads for per-file processing (0 = auto)
    #[serde(default)]
    pub threads: usize,
}

/// Output format enumeration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One token per line
    #[default]
    Text,
    /// JSON document
    Json,
}

fn default_true() -> bool {
    true
}

fn default_max_file_size() -> u64 {
    1024 * 1024 // 1 MB
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            strip_comments: true,
            strip_imports: true,
        }
    }
}

impl Default for AnonymizerConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            class_scope: true,
            function_scope: true,
            reject_syntax_errors: true,
            max_file_size: default_max_file_size(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            output_path: None,
        }
    }
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self { threads: 0 }
    }
}

impl ConcurrencyConfig {
    /// Resolve the worker count, substituting the CPU count for 0.
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> crate::error::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Create a configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for creating configurations programmatically.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn strip_comments(mut self, enable: bool) -> Self {
        self.config.filter.strip_comments = enable;
        self
    }

    pub fn strip_imports(mut self, enable: bool) -> Self {
        self.config.filter.strip_imports = enable;
        self
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config.anonymizer.dialect = dialect;
        self
    }

    pub fn class_scope(mut self, enable: bool) -> Self {
        self.config.anonymizer.class_scope = enable;
        self
    }

    pub fn function_scope(mut self, enable: bool) -> Self {
        self.config.anonymizer.function_scope = enable;
        self
    }

    pub fn reject_syntax_errors(mut self, enable: bool) -> Self {
        self.config.anonymizer.reject_syntax_errors = enable;
        self
    }

    pub fn max_file_size(mut self, size: u64) -> Self {
        self.config.anonymizer.max_file_size = size;
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output.format = format;
        self
    }

    pub fn output_path(mut self, path: PathBuf) -> Self {
        self.config.output.output_path = Some(path);
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.config.concurrency.threads = threads;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.filter.strip_comments);
        assert!(config.filter.strip_imports);
        assert!(config.anonymizer.class_scope);
        assert!(config.anonymizer.function_scope);
        assert!(config.anonymizer.reject_syntax_errors);
        assert_eq!(config.anonymizer.dialect, Dialect::TypeScript);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
[filter]
strip_imports = false

[anonymizer]
dialect = "tsx"

[output]
format = "json"
"#,
        )
        .unwrap();

        assert!(!config.filter.strip_imports);
        assert!(config.filter.strip_comments);
        assert_eq!(config.anonymizer.dialect, Dialect::Tsx);
        assert!(config.anonymizer.function_scope);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.concurrency.threads, 0);
    }

    #[test]
    fn test_empty_toml() {
        let config = Config::from_toml("").unwrap();
        assert!(config.anonymizer.class_scope);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_toml("[anonymizer]\ndialect = \"cobol\"").is_err());
    }

    #[test]
    fn test_builder() {
        let config = Config::builder()
            .strip_comments(false)
            .class_scope(false)
            .threads(3)
            .build();

        assert!(!config.filter.strip_comments);
        assert!(!config.anonymizer.class_scope);
        assert_eq!(config.concurrency.effective_threads(), 3);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token_prep.toml");
        std::fs::write(&path, "[concurrency]\nthreads = 2\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.concurrency.threads, 2);
    }
}
