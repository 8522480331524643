#![forbid(unsafe_code)]

//! Search, keyboard navigation and text splicing for tree-shaped comboboxes.
//!
//! The crate is presentation-free. A host renders rows, owns the text input
//! widget and delivers tree data; the engine decides what is visible, what
//! has focus and what the input value becomes when a node is chosen.
//!
//! - [`node`] and [`tree`]: the forest and read-only traversal helpers.
//! - [`filter`]: pruning a forest by a search term.
//! - [`expansion`]: the set of open branches.
//! - [`navigation`]: the keyboard state machine.
//! - [`splice`]: inserting a chosen label at the caret.
//! - [`combobox`]: [`TreeCombobox`](combobox::TreeCombobox), which wires the
//!   above into one per-instance engine.

pub mod combobox;
pub mod config;
pub mod error;
pub mod expansion;
pub mod filter;
pub mod navigation;
pub mod node;
pub mod splice;
pub mod tree;

pub use error::{Error, Result};

/// Common imports for hosts.
pub mod prelude {
    pub use crate::combobox::{ComboAction, Outcome, RefreshTicket, RowView, TreeCombobox};
    pub use crate::config::{ComboboxConfig, FilterMode, SearchScope};
    pub use crate::expansion::ExpansionSet;
    pub use crate::navigation::{CommitKey, DropdownState};
    pub use crate::node::Node;
    pub use crate::Error;
    pub use treecombo_core::event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};
}
