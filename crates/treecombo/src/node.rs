#![forbid(unsafe_code)]

//! Tree nodes.
//!
//! A forest is a plain `Vec<Node>` supplied by the host. Nodes are values:
//! the engine never mutates one in place, filtering builds new nodes that
//! keep the original ids.
//!
//! # Example
//!
//! ```
//! use treecombo::node::Node;
//!
//! let forest = vec![
//!     Node::branch("g00", "G00 Bacterial meningitis")
//!         .child(Node::leaf("g00.9", "G00.9 Meningitis, unspecified")),
//!     Node::leaf("g03", "G03 Meningitis due to other causes"),
//! ];
//!
//! assert!(forest[0].is_branch());
//! assert_eq!(forest[0].children()[0].id(), "g00.9");
//! ```

/// Whether a node may own children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// May own zero or more ordered children.
    Branch(Vec<Node>),
    /// Never owns children.
    Leaf,
}

/// A node in the forest.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "wire::WireNode", into = "wire::WireNode")
)]
pub struct Node {
    id: String,
    label: String,
    description: Option<String>,
    kind: NodeKind,
}

impl Node {
    /// Create a leaf node.
    #[must_use]
    pub fn leaf(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            kind: NodeKind::Leaf,
        }
    }

    /// Create a branch node with no children yet.
    #[must_use]
    pub fn branch(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            kind: NodeKind::Branch(Vec::new()),
        }
    }

    /// Add a child node. A leaf becomes a branch.
    #[must_use]
    pub fn child(mut self, node: Node) -> Self {
        match &mut self.kind {
            NodeKind::Branch(children) => children.push(node),
            NodeKind::Leaf => self.kind = NodeKind::Branch(vec![node]),
        }
        self
    }

    /// Replace the children. A leaf becomes a branch.
    #[must_use]
    pub fn with_children(mut self, nodes: Vec<Node>) -> Self {
        self.kind = NodeKind::Branch(nodes);
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Stable identity, unique across the forest.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Searchable display text.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Free-form description. Not searched.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Branch or leaf.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Whether this node is a branch (even one without children).
    #[must_use]
    pub fn is_branch(&self) -> bool {
        matches!(self.kind, NodeKind::Branch(_))
    }

    /// The children, empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Branch(children) => children,
            NodeKind::Leaf => &[],
        }
    }

    /// A branch with at least one child; only these can be opened.
    #[must_use]
    pub fn is_expandable(&self) -> bool {
        !self.children().is_empty()
    }

    /// Copy of this node with different children, keeping id, label and
    /// description.
    pub(crate) fn with_replaced_children(&self, children: Vec<Node>) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            description: self.description.clone(),
            kind: NodeKind::Branch(children),
        }
    }
}

/// JSON shape: a node is a branch iff it carries a `children` field.
#[cfg(feature = "serde")]
mod wire {
    use super::{Node, NodeKind};

    #[derive(serde::Serialize, serde::Deserialize)]
    pub(super) struct WireNode {
        id: String,
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        children: Option<Vec<Node>>,
    }

    impl From<WireNode> for Node {
        fn from(wire: WireNode) -> Self {
            Node {
                id: wire.id,
                label: wire.label,
                description: wire.description,
                kind: match wire.children {
                    Some(children) => NodeKind::Branch(children),
                    None => NodeKind::Leaf,
                },
            }
        }
    }

    impl From<Node> for WireNode {
        fn from(node: Node) -> Self {
            WireNode {
                id: node.id,
                label: node.label,
                description: node.description,
                children: match node.kind {
                    NodeKind::Branch(children) => Some(children),
                    NodeKind::Leaf => None,
                },
            }
        }
    }
}

/// Parse a forest from JSON and check that ids are unique.
#[cfg(feature = "serde")]
pub fn forest_from_json(json: &str) -> crate::Result<Vec<Node>> {
    let forest: Vec<Node> =
        serde_json::from_str(json).map_err(|e| crate::Error::Parse(e.to_string()))?;
    crate::tree::validate_forest(&forest)?;
    Ok(forest)
}
