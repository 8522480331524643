#![forbid(unsafe_code)]

//! Search/filter engine.
//!
//! Prunes a forest down to the branches that lead to matching labels and
//! reports which branches must be opened so every match is on screen.
//!
//! # Matching
//!
//! Case-insensitive substring search: both sides are compared after Unicode
//! lowercasing, and a match must start on a character boundary of the label.
//!
//! # Pruning rules (bottom-up)
//!
//! - A leaf survives iff its label matches.
//! - A branch survives iff its label matches or at least one descendant
//!   survives. Its children are replaced by the surviving children; a branch
//!   that only matched itself keeps no children and is shown closed.
//! - Every ancestor of a survivor, and every branch with surviving children,
//!   goes into the auto-expand set.
//!
//! The input forest is never modified.

use std::collections::HashSet;
use std::ops::Range;

use crate::node::{Node, NodeKind};

/// Result of [`filter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult {
    /// The pruned forest. Order of surviving siblings is preserved.
    pub tree: Vec<Node>,
    /// Branches to open, or `None` when the term was empty and expansion
    /// must be left alone.
    pub auto_expand: Option<HashSet<String>>,
}

impl FilterResult {
    /// Whether nothing survived.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

/// Prune `forest` to the nodes relevant to `term`.
///
/// An empty term returns the forest unchanged with no auto-expand set.
#[must_use]
pub fn filter(forest: &[Node], term: &str) -> FilterResult {
    if term.is_empty() {
        return FilterResult {
            tree: forest.to_vec(),
            auto_expand: None,
        };
    }

    let needle = Needle::new(term);
    let mut auto_expand = HashSet::new();
    let mut ancestors = Vec::new();
    let tree = forest
        .iter()
        .filter_map(|node| prune(node, &needle, &mut ancestors, &mut auto_expand))
        .collect();

    FilterResult {
        tree,
        auto_expand: Some(auto_expand),
    }
}

fn prune<'a>(
    node: &'a Node,
    needle: &Needle,
    ancestors: &mut Vec<&'a str>,
    auto_expand: &mut HashSet<String>,
) -> Option<Node> {
    let direct = needle.find_in(node.label()).is_some();

    let kept = match node.kind() {
        NodeKind::Leaf => {
            if !direct {
                return None;
            }
            auto_expand.extend(ancestors.iter().map(|id| (*id).to_owned()));
            return Some(node.clone());
        }
        NodeKind::Branch(children) => {
            ancestors.push(node.id());
            let kept: Vec<Node> = children
                .iter()
                .filter_map(|child| prune(child, needle, ancestors, auto_expand))
                .collect();
            ancestors.pop();
            kept
        }
    };

    if kept.is_empty() && !direct {
        return None;
    }

    auto_expand.extend(ancestors.iter().map(|id| (*id).to_owned()));
    if !kept.is_empty() {
        auto_expand.insert(node.id().to_owned());
    }
    Some(node.with_replaced_children(kept))
}

/// Whether `label` contains `term`, ignoring case. Every label contains the
/// empty term.
#[must_use]
pub fn matches(label: &str, term: &str) -> bool {
    Needle::new(term).find_in(label).is_some()
}

/// Byte range of the first case-insensitive occurrence of `term` in `label`,
/// for highlighting. `None` for an empty term or no occurrence.
#[must_use]
pub fn match_range(label: &str, term: &str) -> Option<Range<usize>> {
    if term.is_empty() {
        return None;
    }
    Needle::new(term).find_in(label)
}

/// Byte range of the last case-insensitive occurrence of `term` in `hay`.
pub(crate) fn last_match_range(hay: &str, term: &str) -> Option<Range<usize>> {
    if term.is_empty() {
        return None;
    }
    let needle = Needle::new(term);
    hay.char_indices()
        .rev()
        .find_map(|(start, _)| needle.match_at(hay, start).map(|end| start..end))
}

/// First node in pre-order whose own label matches `term`, looking through
/// closed branches too.
#[must_use]
pub fn first_match<'a>(forest: &'a [Node], term: &str) -> Option<&'a Node> {
    if term.is_empty() {
        return None;
    }
    let needle = Needle::new(term);
    first_match_with(forest, &needle)
}

fn first_match_with<'a>(nodes: &'a [Node], needle: &Needle) -> Option<&'a Node> {
    for node in nodes {
        if needle.find_in(node.label()).is_some() {
            return Some(node);
        }
        if let Some(found) = first_match_with(node.children(), needle) {
            return Some(found);
        }
    }
    None
}

/// Lowercased search term.
struct Needle {
    chars: Vec<char>,
}

impl Needle {
    fn new(term: &str) -> Self {
        Self {
            chars: term.chars().flat_map(char::to_lowercase).collect(),
        }
    }

    fn find_in(&self, hay: &str) -> Option<Range<usize>> {
        if self.chars.is_empty() {
            return Some(0..0);
        }
        hay.char_indices()
            .find_map(|(start, _)| self.match_at(hay, start).map(|end| start..end))
    }

    /// End offset of a match starting at byte `start`, if any.
    fn match_at(&self, hay: &str, start: usize) -> Option<usize> {
        let mut wanted = self.chars.iter();
        let mut next = wanted.next();
        for (offset, ch) in hay[start..].char_indices() {
            for lower in ch.to_lowercase() {
                match next {
                    Some(&want) if want == lower => next = wanted.next(),
                    Some(_) => return None,
                    None => break,
                }
            }
            if next.is_none() {
                return Some(start + offset + ch.len_utf8());
            }
        }
        None
    }
}
