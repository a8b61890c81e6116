//! Source file models.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Grammar dialect used to parse a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Plain TypeScript (`.ts`, `.mts`, `.cts`).
    #[default]
    TypeScript,
    /// TypeScript with JSX (`.tsx`).
    Tsx,
}

impl Dialect {
    /// Detect the dialect from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            _ => None,
        }
    }

    /// Detect the dialect from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Parse a dialect name as given on the command line or in config.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "typescript" | "ts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            _ => None,
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::TypeScript => write!(f, "typescript"),
            Dialect::Tsx => write!(f, "tsx"),
        }
    }
}

/// A source file handed to the pipeline.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path as given by the caller
    pub path: PathBuf,

    /// Dialect used to parse the file
    pub dialect: Dialect,

    /// File size in bytes
    pub size: u64,

    /// File content (loaded on demand)
    pub content: Option<String>,
}

impl SourceFile {
    /// Describe a file on disk, detecting its dialect from the extension and
    /// falling back to `default_dialect`.
    pub fn open(path: impl Into<PathBuf>, default_dialect: Dialect) -> std::io::Result<Self> {
        let path = path.into();
        let size = std::fs::metadata(&path)?.len();
        let dialect = Dialect::from_path(&path).unwrap_or(default_dialect);

        Ok(Self {
            path,
            dialect,
            size,
            content: None,
        })
    }

    /// Load the file content if not already loaded.
    pub fn load_content(&mut self) -> std::io::Result<&str> {
        let content = match self.content.take() {
            Some(content) => content,
            None => std::fs::read_to_string(&self.path)?,
        };
        Ok(self.content.insert(content).as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_dialect_from_extension() {
        assert_eq!(Dialect::from_extension("ts"), Some(Dialect::TypeScript));
        assert_eq!(Dialect::from_extension("MTS"), Some(Dialect::TypeScript));
        assert_eq!(Dialect::from_extension("tsx"), Some(Dialect::Tsx));
        assert_eq!(Dialect::from_extension("rs"), None);
    }

    #[test]
    fn test_dialect_from_name() {
        assert_eq!(Dialect::from_name("TypeScript"), Some(Dialect::TypeScript));
        assert_eq!(Dialect::from_name(" tsx "), Some(Dialect::Tsx));
        assert_eq!(Dialect::from_name("python"), None);
    }

    #[test]
    fn test_source_file_open_and_load() {
        let mut file = tempfile::Builder::new().suffix(".tsx").tempfile().unwrap();
        write!(file, "const a = 1;").unwrap();

        let mut source = SourceFile::open(file.path(), Dialect::TypeScript).unwrap();
        assert_eq!(source.dialect, Dialect::Tsx);
        assert_eq!(source.size, 12);
        assert_eq!(source.load_content().unwrap(), "const a = 1;");
    }

    #[test]
    fn test_source_file_default_dialect() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let source = SourceFile::open(file.path(), Dialect::Tsx).unwrap();
        assert_eq!(source.dialect, Dialect::Tsx);
    }
}
