//! Planned text substitutions keyed by byte range.

use crate::error::{PrepError, Result};

/// A planned substitution of `text[start..end]` with `text`.
///
/// Offsets refer to the input of the pass that produced the replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// Text written in place of the range.
    pub text: String,
    /// Start byte (inclusive).
    pub start: usize,
    /// End byte (exclusive).
    pub end: usize,
}

impl Replacement {
    /// Create a new replacement.
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

/// Apply replacements computed against `source`.
///
/// Replacements are spliced rightmost first (descending end offset) so an
/// edit never shifts the offsets of edits still waiting to be applied.
/// Overlapping or out-of-bounds ranges are rejected before anything is
/// written.
pub fn apply_replacements(source: &str, mut replacements: Vec<Replacement>) -> Result<String> {
    replacements.sort_by(|a, b| b.end.cmp(&a.end).then(b.start.cmp(&a.start)));

    let mut lower_bound = source.len();
    let mut previous: Option<&Replacement> = None;
    for replacement in &replacements {
        if replacement.start > replacement.end
            || replacement.end > source.len()
            || !source.is_char_boundary(replacement.start)
            || !source.is_char_boundary(replacement.end)
        {
            return Err(PrepError::InvalidReplacement {
                start: replacement.start,
                end: replacement.end,
                len: source.len(),
            });
        }

        if replacement.end > lower_bound {
            if let Some(prev) = previous {
                return Err(PrepError::OverlappingReplacements {
                    first_start: replacement.start,
                    first_end: replacement.end,
                    second_start: prev.start,
                    second_end: prev.end,
                });
            }
        }

        lower_bound = replacement.start;
        previous = Some(replacement);
    }

    let mut result = source.to_string();
    for replacement in &replacements {
        result.replace_range(replacement.start..replacement.end, &replacement.text);
    }

    Ok(result)
}
