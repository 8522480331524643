#![forbid(unsafe_code)]

//! Expansion state: which branches are open.
//!
//! # Invariants
//!
//! 1. A frozen set ("default expanded" mode) contains every branch id of the
//!    forest it was built from and never loses an id through `collapse` or
//!    `replace`.
//! 2. `replace` swaps the whole set; search results are authoritative while a
//!    term is active.

use std::collections::HashSet;

use crate::node::Node;
use crate::tree;

/// Set of expanded node ids, owned by one combobox instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionSet {
    ids: HashSet<String>,
    frozen: bool,
}

impl ExpansionSet {
    /// Empty, mutable set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frozen set holding every branch of `forest`.
    #[must_use]
    pub fn all_expanded(forest: &[Node]) -> Self {
        Self {
            ids: tree::branch_ids(forest),
            frozen: true,
        }
    }

    /// Mutable set pre-populated with `ids`.
    #[must_use]
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            frozen: false,
        }
    }

    /// Whether the set is locked open.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Whether `id` is expanded.
    #[must_use]
    pub fn is_expanded(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Open `id`. Returns `true` if the set changed.
    pub fn expand(&mut self, id: &str) -> bool {
        if self.frozen {
            return false;
        }
        self.ids.insert(id.to_owned())
    }

    /// Close `id`. Returns `true` if the set changed.
    pub fn collapse(&mut self, id: &str) -> bool {
        if self.frozen {
            return false;
        }
        self.ids.remove(id)
    }

    /// Replace the whole set. Ignored when frozen; returns `true` if applied.
    pub fn replace(&mut self, ids: HashSet<String>) -> bool {
        if self.frozen {
            return false;
        }
        self.ids = ids;
        true
    }

    /// Re-derive a frozen set after the forest was swapped out.
    pub fn refreeze(&mut self, forest: &[Node]) {
        if self.frozen {
            self.ids = tree::branch_ids(forest);
        }
    }

    /// Number of expanded ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is expanded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
