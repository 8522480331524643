#![forbid(unsafe_code)]

//! Read-only traversal helpers over a forest.
//!
//! The visible order is a depth-first pre-order walk in which a branch's
//! children are only visited when the branch is in the [`ExpansionSet`].
//! It is the order the dropdown renders rows in and the order arrow keys
//! step through.
//!
//! Lookups of an id that is not in the forest return `None` or an empty
//! path; they never panic. With duplicate ids the first node in pre-order
//! wins.

use std::collections::HashSet;

use crate::expansion::ExpansionSet;
use crate::node::Node;
use crate::{Error, Result};

/// A node as it appears in the flattened dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow<'a> {
    /// The node on this row.
    pub node: &'a Node,
    /// Nesting depth; top-level nodes are depth 0.
    pub depth: usize,
    /// Whether the node is an open branch with children to show.
    pub expanded: bool,
}

/// Nodes currently visible, in dropdown order.
#[must_use]
pub fn flatten_visible<'a>(forest: &'a [Node], expansion: &ExpansionSet) -> Vec<&'a Node> {
    visible_rows(forest, expansion)
        .into_iter()
        .map(|row| row.node)
        .collect()
}

/// Visible rows with depth and open state, in dropdown order.
#[must_use]
pub fn visible_rows<'a>(forest: &'a [Node], expansion: &ExpansionSet) -> Vec<VisibleRow<'a>> {
    let mut out = Vec::new();
    for node in forest {
        walk_visible(node, 0, expansion, &mut out);
    }
    out
}

fn walk_visible<'a>(
    node: &'a Node,
    depth: usize,
    expansion: &ExpansionSet,
    out: &mut Vec<VisibleRow<'a>>,
) {
    let expanded = node.is_expandable() && expansion.is_expanded(node.id());
    out.push(VisibleRow {
        node,
        depth,
        expanded,
    });
    if !expanded {
        return;
    }
    for child in node.children() {
        walk_visible(child, depth + 1, expansion, out);
    }
}

/// Whether `id` is on a visible row.
#[must_use]
pub fn is_visible(id: &str, forest: &[Node], expansion: &ExpansionSet) -> bool {
    forest.iter().any(|node| visible_contains(node, id, expansion))
}

fn visible_contains(node: &Node, id: &str, expansion: &ExpansionSet) -> bool {
    if node.id() == id {
        return true;
    }
    node.is_branch()
        && expansion.is_expanded(node.id())
        && node
            .children()
            .iter()
            .any(|child| visible_contains(child, id, expansion))
}

/// Find a node anywhere in the forest, regardless of expansion.
#[must_use]
pub fn find_node<'a>(id: &str, forest: &'a [Node]) -> Option<&'a Node> {
    for node in forest {
        if node.id() == id {
            return Some(node);
        }
        if let Some(found) = find_node(id, node.children()) {
            return Some(found);
        }
    }
    None
}

/// Parent of `id`, searching only below open branches.
///
/// A direct child of any node reachable through open branches is matched,
/// so the parent is found exactly when `id` could be on screen. Top-level
/// nodes and unknown ids have no parent.
#[must_use]
pub fn find_parent<'a>(id: &str, forest: &'a [Node], expansion: &ExpansionSet) -> Option<&'a Node> {
    for node in forest {
        if node.children().iter().any(|child| child.id() == id) {
            return Some(node);
        }
        if expansion.is_expanded(node.id())
            && let Some(parent) = find_parent(id, node.children(), expansion)
        {
            return Some(parent);
        }
    }
    None
}

/// Ancestors of `id` from the top level down to its parent.
///
/// Expansion is ignored. Top-level and unknown ids both yield an empty path.
#[must_use]
pub fn build_path<'a>(id: &str, forest: &'a [Node]) -> Vec<&'a Node> {
    let mut path = Vec::new();
    if descend(id, forest, &mut path) {
        path
    } else {
        Vec::new()
    }
}

fn descend<'a>(id: &str, nodes: &'a [Node], path: &mut Vec<&'a Node>) -> bool {
    for node in nodes {
        if node.id() == id {
            return true;
        }
        path.push(node);
        if descend(id, node.children(), path) {
            return true;
        }
        path.pop();
    }
    false
}

/// Ids of every branch, with or without children.
#[must_use]
pub fn branch_ids(forest: &[Node]) -> HashSet<String> {
    let mut out = HashSet::new();
    collect_branches(forest, false, &mut out);
    out
}

/// Ids of every branch that has at least one child.
#[must_use]
pub fn expandable_ids(forest: &[Node]) -> HashSet<String> {
    let mut out = HashSet::new();
    collect_branches(forest, true, &mut out);
    out
}

fn collect_branches(nodes: &[Node], require_children: bool, out: &mut HashSet<String>) {
    for node in nodes {
        if node.is_branch() && (!require_children || node.is_expandable()) {
            out.insert(node.id().to_owned());
        }
        collect_branches(node.children(), require_children, out);
    }
}

/// Check that no id repeats anywhere in the forest.
pub fn validate_forest(forest: &[Node]) -> Result<()> {
    fn visit<'a>(nodes: &'a [Node], seen: &mut HashSet<&'a str>) -> Result<()> {
        for node in nodes {
            if !seen.insert(node.id()) {
                return Err(Error::DuplicateId(node.id().to_owned()));
            }
            visit(node.children(), seen)?;
        }
        Ok(())
    }
    visit(forest, &mut HashSet::new())
}
