#![forbid(unsafe_code)]

//! Text splicing: putting a chosen label into the input value.
//!
//! Caret positions are grapheme-cluster indices, the same unit a single-line
//! text input uses for its cursor.
//!
//! The *active token* is the text between the last space before the caret
//! and the caret. Committing a label replaces a non-empty active token, or
//! inserts at the caret when the token is empty. No separator is ever added.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use crate::filter;

/// New input value and where the caret belongs in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    /// The full new input value.
    pub value: String,
    /// Caret position (grapheme index) to restore after `value` is applied.
    pub caret: usize,
}

/// Put `label` into `value` at `caret`.
///
/// A caret past the end is clamped to the end.
///
/// ```
/// use treecombo::splice::splice;
///
/// let out = splice("abc de", 6, "XYZ");
/// assert_eq!(out.value, "abc XYZ");
/// assert_eq!(out.caret, 7);
/// ```
#[must_use]
pub fn splice(value: &str, caret: usize, label: &str) -> Splice {
    let token = active_token_range(value, caret);
    let label_len = label.graphemes(true).count();

    let start_byte = grapheme_byte_offset(value, token.start);
    let end_byte = grapheme_byte_offset(value, token.end);

    let mut out = String::with_capacity(value.len() + label.len());
    out.push_str(&value[..start_byte]);
    out.push_str(label);
    out.push_str(&value[end_byte..]);

    Splice {
        value: out,
        caret: token.start + label_len,
    }
}

/// Grapheme range of the active token. Empty when the caret sits at the
/// start of the value or right after a space.
#[must_use]
pub fn active_token_range(value: &str, caret: usize) -> Range<usize> {
    let mut word_start = 0;
    let mut end = 0;
    for (idx, g) in value.graphemes(true).take(caret).enumerate() {
        if g == " " {
            word_start = idx + 1;
        }
        end = idx + 1;
    }
    word_start..end
}

/// The active token as a string slice.
#[must_use]
pub fn active_token(value: &str, caret: usize) -> &str {
    let range = active_token_range(value, caret);
    &value[grapheme_byte_offset(value, range.start)..grapheme_byte_offset(value, range.end)]
}

/// Byte range of `term` in `text` for highlighting inside the input.
///
/// An occurrence inside the last space-separated part wins; otherwise the
/// last occurrence anywhere.
#[must_use]
pub fn last_term_match(text: &str, term: &str) -> Option<Range<usize>> {
    if term.is_empty() {
        return None;
    }
    let tail_start = text.rfind(' ').map_or(0, |idx| idx + 1);
    if let Some(range) = filter::match_range(&text[tail_start..], term) {
        return Some(tail_start + range.start..tail_start + range.end);
    }
    filter::last_match_range(text, term)
}

/// Number of graphemes in `value`; the largest valid caret.
#[must_use]
pub fn grapheme_len(value: &str) -> usize {
    value.graphemes(true).count()
}

fn grapheme_byte_offset(value: &str, grapheme_idx: usize) -> usize {
    value
        .grapheme_indices(true)
        .nth(grapheme_idx)
        .map_or(value.len(), |(offset, _)| offset)
}
