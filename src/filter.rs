//! Line-anchored text filter run before anonymization.
//!
//! Comments are stripped line by line with no awareness of string
//! literals, so a `//` inside a string on the same line also truncates it.

use crate::config::FilterConfig;
use crate::error::Result;
use regex::Regex;
use std::sync::OnceLock;

/// From the first `//` to end of line, plus the whitespace run before it.
const LINE_COMMENT_PATTERN: &str = r"(?m)\s*//.*$";

/// Whole `import ...` lines, including their line break. Dynamic `import(`
/// and `import.meta` are expressions, not declarations.
const IMPORT_LINE_PATTERN: &str = r"(?m)^[ \t]*import[^\w$(.\r\n].*(?:\r?\n)?";

static DEFAULT_FILTER: OnceLock<Filter> = OnceLock::new();

/// Comment and import stripper.
#[derive(Debug, Clone)]
pub struct Filter {
    line_comment: Option<Regex>,
    import_line: Option<Regex>,
}

impl Filter {
    /// Compile the patterns enabled by `config`.
    pub fn new(config: &FilterConfig) -> Result<Self> {
        let line_comment = if config.strip_comments {
            Some(Regex::new(LINE_COMMENT_PATTERN)?)
        } else {
            None
        };

        let import_line = if config.strip_imports {
            Some(Regex::new(IMPORT_LINE_PATTERN)?)
        } else {
            None
        };

        Ok(Self {
            line_comment,
            import_line,
        })
    }

    /// Strip comments and import lines, then trim the whole text.
    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();

        if let Some(ref re) = self.line_comment {
            result = re.replace_all(&result, "").into_owned();
        }

        if let Some(ref re) = self.import_line {
            result = re.replace_all(&result, "").into_owned();
        }

        result.trim().to_string()
    }
}

/// Filter `text` with every stage enabled.
pub fn filter(text: &str) -> Result<String> {
    if let Some(filter) = DEFAULT_FILTER.get() {
        return Ok(filter.apply(text));
    }

    let filter = Filter::new(&FilterConfig::default())?;
    Ok(DEFAULT_FILTER.get_or_init(|| filter).apply(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_stripped_on_its_line_only() {
        let result = filter("let x = 1; // comment\nlet y = 2;").unwrap();
        assert_eq!(result, "let x = 1;\nlet y = 2;");
    }

    #[test]
    fn test_full_line_comment_removed() {
        let result = filter("let a = 1;\n// note\nlet b = 2;").unwrap();
        assert!(!result.contains("note"));
        assert!(result.contains("let a = 1;"));
        assert!(result.contains("let b = 2;"));
    }

    #[test]
    fn test_comment_inside_string_is_not_special() {
        let result = filter("const url = \"http://example.com\";").unwrap();
        assert_eq!(result, "const url = \"http:");
    }

    #[test]
    fn test_import_lines_removed() {
        let text = "import { a } from './a';\nimport * as b from 'b';\n  import 'side';\nconst c = a + b;";
        let result = filter(text).unwrap();
        assert_eq!(result, "const c = a + b;");
    }

    #[test]
    fn test_import_without_space_after_keyword_removed() {
        let text = "import\"./polyfill\";\nimport*as x from 'x';\nimport{ y } from 'y';\nrun(x, y);";
        let result = filter(text).unwrap();
        assert_eq!(result, "run(x, y);");
    }

    #[test]
    fn test_dynamic_import_and_import_meta_are_kept() {
        let text = "import('./lazy').then(run);\nimport.meta.url;";
        let result = filter(text).unwrap();
        assert_eq!(result, text);
    }

    #[test]
    fn test_identifiers_starting_with_import_are_kept() {
        let result = filter("importantValue = 1;\nconst imported = 2;").unwrap();
        assert_eq!(result, "importantValue = 1;\nconst imported = 2;");
    }

    #[test]
    fn test_result_is_trimmed() {
        let result = filter("\n\n   class A {}   \n\n").unwrap();
        assert_eq!(result, "class A {}");
    }

    #[test]
    fn test_stages_can_be_disabled() {
        let config = FilterConfig {
            strip_comments: false,
            strip_imports: false,
        };
        let filter = Filter::new(&config).unwrap();

        let text = "import x from 'x';\nlet a = 1; // keep";
        assert_eq!(filter.apply(text), text);
    }
}
