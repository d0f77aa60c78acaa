//! Text edits and their application.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A single text replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// Byte range to replace.
    pub range: Range<usize>,
    /// Replacement text.
    pub text: String,
}

/// An automatic fix: ordered, non-overlapping edits applied together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    /// Edits in source order.
    pub edits: Vec<Edit>,
}

impl Fix {
    /// A fix made of a single replacement.
    #[must_use]
    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            edits: vec![Edit {
                range,
                text: text.into(),
            }],
        }
    }

    /// Inserts text at a byte offset.
    #[must_use]
    pub fn insert_at(offset: usize, text: impl Into<String>) -> Self {
        Self::replace(offset..offset, text)
    }

    /// Removes a byte range.
    #[must_use]
    pub fn remove(range: Range<usize>) -> Self {
        Self::replace(range, "")
    }

    /// Builds a fix from several edits, dropping no-op ones.
    ///
    /// Returns `None` if no edit changes anything.
    #[must_use]
    pub fn from_edits(edits: impl IntoIterator<Item = Edit>) -> Option<Self> {
        let mut edits: Vec<Edit> = edits
            .into_iter()
            .filter(|e| !(e.range.is_empty() && e.text.is_empty()))
            .collect();
        edits.sort_by_key(|e| (e.range.start, e.range.end));
        (!edits.is_empty()).then_some(Self { edits })
    }

    /// Byte range spanned by all edits.
    #[must_use]
    pub fn span(&self) -> Option<Range<usize>> {
        let start = self.edits.iter().map(|e| e.range.start).min()?;
        let end = self.edits.iter().map(|e| e.range.end).max()?;
        Some(start..end)
    }
}

/// Outcome of [`apply_fixes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// Text after applying the fixes.
    pub output: String,
    /// Number of fixes applied.
    pub applied: usize,
    /// Number of fixes skipped because they overlapped an applied one.
    pub skipped: usize,
}

/// Applies fixes to `text`.
///
/// Fixes are taken in order of their start offset. A fix is applied only if
/// it begins after the end of the previously applied fix; the others are
/// skipped so that a later pass can recompute them against the new text.
#[must_use]
pub fn apply_fixes<'f>(text: &str, fixes: impl IntoIterator<Item = &'f Fix>) -> FixOutcome {
    let mut fixes: Vec<(Range<usize>, &Fix)> = fixes
        .into_iter()
        .filter_map(|fix| fix.span().map(|span| (span, fix)))
        .collect();
    fixes.sort_by_key(|(span, _)| (span.start, span.end));

    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut last_end: Option<usize> = None;
    let mut applied = 0;
    let mut skipped = 0;

    for (span, fix) in fixes {
        let overlaps = last_end.is_some_and(|end| span.start <= end);
        if overlaps || span.end > text.len() {
            skipped += 1;
            continue;
        }
        for edit in &fix.edits {
            output.push_str(&text[cursor..edit.range.start]);
            output.push_str(&edit.text);
            cursor = edit.range.end;
        }
        last_end = Some(span.end);
        applied += 1;
    }
    output.push_str(&text[cursor..]);

    FixOutcome {
        output,
        applied,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applies_non_overlapping_fixes_in_offset_order() {
        let second = Fix::insert_at(5, "\n");
        let first = Fix::remove(1..2);
        let outcome = apply_fixes("f ();(x)", [&second, &first]);
        assert_eq!(outcome.output, "f();\n(x)");
        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_skips_fixes_touching_the_previous_fix() {
        let a = Fix::insert_at(4, "\n");
        let b = Fix::insert_at(4, "\n");
        let outcome = apply_fixes("foo([a])", [&a, &b]);
        assert_eq!(outcome.output, "foo(\n[a])");
        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn test_applies_multi_edit_fixes_atomically() {
        let fix = Fix::from_edits([
            Edit {
                range: 6..8,
                text: String::new(),
            },
            Edit {
                range: 0..2,
                text: String::new(),
            },
        ])
        .unwrap();
        assert_eq!(fix.span(), Some(0..8));
        let outcome = apply_fixes("  /**\n   */", [&fix]);
        assert_eq!(outcome.output, "/**\n */");
    }

    #[test]
    fn test_from_edits_drops_no_ops() {
        let edits = [Edit {
            range: 3..3,
            text: String::new(),
        }];
        assert!(Fix::from_edits(edits).is_none());
    }
}
