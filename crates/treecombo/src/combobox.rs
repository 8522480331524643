#![forbid(unsafe_code)]

//! The per-instance combobox engine.
//!
//! [`TreeCombobox`] owns everything one mounted widget mutates: the input
//! value and caret, the filtered view, the [`ExpansionSet`] and the
//! [`NavigationState`]. The host feeds it input through the `on_*` methods
//! and [`TreeCombobox::handle_key`], and acts on the [`ComboAction`]s that
//! come back in each [`Outcome`], in order.
//!
//! Ordering within one call: the filter result is applied first, then focus
//! is reconciled against the new view, then visibility is decided.
//!
//! # Remote data
//!
//! In [`FilterMode::Remote`] the host filters (or fetches) trees itself.
//! Text changes, commits and the force-open shortcut emit
//! [`ComboAction::RefreshRequested`] carrying a [`RefreshTicket`]; the host
//! answers with [`TreeCombobox::on_refresh_completed`]. Only the answer to
//! the most recent ticket is applied. Anything older is dropped.
//!
//! # Example
//!
//! ```
//! use treecombo::prelude::*;
//!
//! let forest = vec![
//!     Node::branch("g", "G00 Bacterial meningitis")
//!         .child(Node::leaf("g0", "G00.0 Haemophilus meningitis"))
//!         .child(Node::leaf("g1", "G00.1 Pneumococcal meningitis")),
//!     Node::leaf("h", "H10 Conjunctivitis"),
//! ];
//! let mut combo = TreeCombobox::new(forest, ComboboxConfig::default());
//!
//! let _ = combo.on_text_changed("pneumo", 6);
//! assert_eq!(combo.dropdown_state(), DropdownState::OpenUncontrolled);
//!
//! let _ = combo.handle_key(&KeyEvent::new(KeyCode::Down));
//! let _ = combo.handle_key(&KeyEvent::new(KeyCode::Down));
//! let outcome = combo.handle_key(&KeyEvent::new(KeyCode::Enter));
//!
//! assert!(outcome.consumed);
//! assert_eq!(combo.value(), "G00.1 Pneumococcal meningitis");
//! assert_eq!(combo.take_pending_caret(), Some(29));
//! ```

use std::ops::Range;

use treecombo_core::event::KeyEvent;

use crate::Result;
use crate::config::{ComboboxConfig, FilterMode, SearchScope};
use crate::expansion::ExpansionSet;
use crate::filter;
use crate::navigation::{CommitKey, DropdownState, NavCommand, NavigationState};
use crate::node::Node;
use crate::splice;
use crate::tree;

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Identifies one refresh request. Only the latest ticket is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    /// Generation number the ticket was issued at.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }
}

/// Something the host must act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComboAction {
    /// Write `value` into the input field, then move its caret to `caret`
    /// (grapheme index). The same caret is also available from
    /// [`TreeCombobox::take_pending_caret`] for hosts that restore it after
    /// the next render.
    ValueChanged {
        /// New input value.
        value: String,
        /// Caret to restore once `value` is applied.
        caret: usize,
    },
    /// A node was chosen.
    SelectionCommitted {
        /// The node from the unfiltered tree.
        node: Node,
        /// Ancestors from the top level down to the node's parent.
        path: Vec<Node>,
        /// What confirmed it.
        key: CommitKey,
    },
    /// A branch was opened.
    NodeExpanded(String),
    /// A branch was closed.
    NodeCollapsed(String),
    /// Arrow keys belong to the text field again.
    ControlTransferredToField,
    /// The user wants to leave the widget.
    QuitRequested,
    /// The dropdown was shown or hidden.
    DropdownVisibilityChanged(bool),
    /// Fetch a tree for `term` and hand it back with `ticket`.
    RefreshRequested {
        /// Current search term.
        term: String,
        /// Pass back to [`TreeCombobox::on_refresh_completed`].
        ticket: RefreshTicket,
    },
}

/// Result of one inbound call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct Outcome {
    /// The key was used by the combobox and must not reach the text field.
    /// Only [`TreeCombobox::handle_key`] sets this.
    pub consumed: bool,
    /// Actions in emission order.
    pub actions: Vec<ComboAction>,
}

impl Outcome {
    fn from_actions(actions: Vec<ComboAction>) -> Self {
        Self {
            consumed: false,
            actions,
        }
    }

    /// Whether nothing needs doing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The committed node, if this outcome carries a selection.
    #[must_use]
    pub fn committed(&self) -> Option<&Node> {
        self.actions.iter().find_map(|action| match action {
            ComboAction::SelectionCommitted { node, .. } => Some(node),
            _ => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One dropdown row, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView<'a> {
    /// The node on this row.
    pub node: &'a Node,
    /// Nesting depth.
    pub depth: usize,
    /// Whether the row is an open branch.
    pub expanded: bool,
    /// Whether the row has keyboard focus.
    pub focused: bool,
    /// Whether the row is the last committed node.
    pub selected: bool,
    /// Byte range of the search term inside the label.
    pub highlight: Option<Range<usize>>,
}

// ---------------------------------------------------------------------------
// Combobox
// ---------------------------------------------------------------------------

/// State of one tree combobox.
#[derive(Debug, Clone)]
pub struct TreeCombobox {
    config: ComboboxConfig,
    /// Host tree. In remote mode, the most recently delivered tree.
    source: Vec<Node>,
    /// What the dropdown shows.
    view: Vec<Node>,
    value: String,
    caret: usize,
    pending_caret: Option<usize>,
    term: String,
    /// Id of the last committed node, while it is still in the source tree.
    selected: Option<String>,
    expansion: ExpansionSet,
    nav: NavigationState,
    /// Bumped on every refresh request and tree replacement.
    generation: u64,
    /// A remote refresh was requested by typing; its answer decides visibility.
    reveal_pending: bool,
}

impl TreeCombobox {
    /// Create a combobox over `source`.
    ///
    /// Ids are assumed unique; see [`TreeCombobox::try_new`].
    #[must_use]
    pub fn new(source: Vec<Node>, config: ComboboxConfig) -> Self {
        let expansion = if config.default_expanded() {
            ExpansionSet::all_expanded(&source)
        } else {
            ExpansionSet::new()
        };
        Self {
            view: source.clone(),
            source,
            config,
            value: String::new(),
            caret: 0,
            pending_caret: None,
            term: String::new(),
            selected: None,
            expansion,
            nav: NavigationState::new(),
            generation: 0,
            reveal_pending: false,
        }
    }

    /// Like [`TreeCombobox::new`], but rejects forests with repeated ids.
    pub fn try_new(source: Vec<Node>, config: ComboboxConfig) -> Result<Self> {
        tree::validate_forest(&source)?;
        Ok(Self::new(source, config))
    }

    /// Start with `value` already in the field (builder). The view is
    /// filtered for it but the dropdown stays closed.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>, caret: usize) -> Self {
        self.set_text(value.into(), caret);
        if self.config.filter_mode() == FilterMode::Local {
            self.refilter();
        }
        self
    }

    // --- accessors ---------------------------------------------------------

    /// Configuration.
    #[must_use]
    pub fn config(&self) -> &ComboboxConfig {
        &self.config
    }

    /// Current input value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Current caret (grapheme index).
    #[must_use]
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Term the view is filtered by.
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.term
    }

    /// Filtered forest shown in the dropdown.
    #[must_use]
    pub fn view(&self) -> &[Node] {
        &self.view
    }

    /// Unfiltered forest.
    #[must_use]
    pub fn source(&self) -> &[Node] {
        &self.source
    }

    /// Expansion state.
    #[must_use]
    pub fn expansion(&self) -> &ExpansionSet {
        &self.expansion
    }

    /// Navigation state.
    #[must_use]
    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    /// Coarse dropdown state.
    #[must_use]
    pub fn dropdown_state(&self) -> DropdownState {
        self.nav.state()
    }

    /// The focused node in the current view.
    #[must_use]
    pub fn focused_node(&self) -> Option<&Node> {
        self.nav
            .focused()
            .and_then(|id| tree::find_node(id, &self.view))
    }

    /// The last committed node, looked up in the source tree.
    #[must_use]
    pub fn selected_node(&self) -> Option<&Node> {
        self.selected
            .as_deref()
            .and_then(|id| tree::find_node(id, &self.source))
    }

    /// Rows in render order, with focus, selection and match highlight. Hosts apply
    /// [`ComboboxConfig::max_results`] when drawing.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<RowView<'_>> {
        let focused = self.nav.focused();
        let selected = self.selected.as_deref();
        tree::visible_rows(&self.view, &self.expansion)
            .into_iter()
            .map(|row| RowView {
                node: row.node,
                depth: row.depth,
                expanded: row.expanded,
                focused: focused == Some(row.node.id()),
                selected: selected == Some(row.node.id()),
                highlight: filter::match_range(row.node.label(), &self.term),
            })
            .collect()
    }

    /// Byte range of the search term inside the input value, for
    /// highlighting the field itself.
    #[must_use]
    pub fn value_highlight(&self) -> Option<Range<usize>> {
        splice::last_term_match(&self.value, &self.term)
    }

    /// Caret to restore after the last committed value was applied. Returns
    /// it once.
    pub fn take_pending_caret(&mut self) -> Option<usize> {
        self.pending_caret.take()
    }

    // --- inbound -----------------------------------------------------------

    /// The user edited the text field.
    ///
    /// Always releases keyboard control back to the field. In local mode the
    /// dropdown is shown iff the new view is non-empty.
    pub fn on_text_changed(&mut self, value: impl Into<String>, caret: usize) -> Outcome {
        self.set_text(value.into(), caret);
        self.nav.release_control();

        let mut actions = Vec::new();
        match self.config.filter_mode() {
            FilterMode::Local => {
                self.refilter();
                self.focus_first_match();
                self.nav.reconcile(&self.view, &self.expansion);
                let visibility = self.nav.show(!self.view.is_empty());
                self.emit(visibility, &mut actions);
            }
            FilterMode::Remote => {
                self.reveal_pending = true;
                actions.push(self.refresh_action());
            }
        }

        treecombo_core::debug!(
            term = %self.term,
            rows = self.view.len(),
            state = ?self.nav.state(),
            "text changed"
        );
        Outcome::from_actions(actions)
    }

    /// The caret moved without the text changing.
    ///
    /// With [`SearchScope::ActiveToken`] a caret move can change the term,
    /// in which case it is handled like a text change.
    pub fn on_caret_moved(&mut self, caret: usize) -> Outcome {
        let caret = caret.min(splice::grapheme_len(&self.value));
        if caret == self.caret {
            return Outcome::default();
        }
        self.caret = caret;
        self.pending_caret = None;

        if self.config.search_scope() == SearchScope::ActiveToken
            && self.compute_term() != self.term
        {
            let value = self.value.clone();
            return self.on_text_changed(value, caret);
        }
        Outcome::default()
    }

    /// Feed a key event.
    ///
    /// Check [`Outcome::consumed`] to decide whether the text field should
    /// still see the key.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Outcome {
        if !key.is_actionable() {
            return Outcome::default();
        }
        if key.is_ctrl_space() {
            return self.force_open();
        }

        let result = self
            .nav
            .handle_key(key, &self.view, &mut self.expansion, &self.config);
        let mut actions = Vec::new();
        self.emit(result.commands, &mut actions);

        treecombo_core::trace!(
            code = ?key.code,
            consumed = result.consumed,
            state = ?self.nav.state(),
            focused = ?self.nav.focused(),
            "key handled"
        );
        Outcome {
            consumed: result.consumed,
            actions,
        }
    }

    /// A row was clicked. Commits it directly.
    pub fn on_row_clicked(&mut self, id: &str) -> Outcome {
        if !tree::is_visible(id, &self.view, &self.expansion) {
            return Outcome::default();
        }
        let mut actions = Vec::new();
        self.nav.set_focus(None);
        self.commit(id, CommitKey::Click, &mut actions);
        let visibility = self.nav.show(false);
        self.emit(visibility, &mut actions);
        Outcome::from_actions(actions)
    }

    /// The expand/collapse toggle of a row was clicked.
    pub fn on_row_expand_toggle_clicked(&mut self, id: &str) -> Outcome {
        let expandable = tree::is_visible(id, &self.view, &self.expansion)
            && tree::find_node(id, &self.view).is_some_and(Node::is_expandable);
        if !expandable || self.expansion.is_frozen() {
            return Outcome::default();
        }

        let action = if self.expansion.collapse(id) {
            self.nav.reconcile(&self.view, &self.expansion);
            treecombo_core::debug!(id, "branch collapsed");
            ComboAction::NodeCollapsed(id.to_owned())
        } else {
            self.expansion.expand(id);
            treecombo_core::debug!(id, "branch expanded");
            ComboAction::NodeExpanded(id.to_owned())
        };
        Outcome::from_actions(vec![action])
    }

    /// A click landed outside both the field and the dropdown.
    pub fn on_outside_click(&mut self) -> Outcome {
        self.reveal_pending = false;
        let mut actions = Vec::new();
        let visibility = self.nav.show(false);
        self.emit(visibility, &mut actions);
        Outcome::from_actions(actions)
    }

    /// Replace the source tree outright.
    ///
    /// Any refresh still in flight becomes stale.
    pub fn on_tree_replaced(&mut self, tree: Vec<Node>) -> Outcome {
        self.generation = self.generation.wrapping_add(1);
        self.install(tree)
    }

    /// Issue a ticket for a host-initiated refresh.
    pub fn request_refresh(&mut self) -> RefreshTicket {
        self.generation = self.generation.wrapping_add(1);
        RefreshTicket(self.generation)
    }

    /// Deliver the tree for `ticket`. Discarded unless `ticket` is the
    /// latest one issued.
    pub fn on_refresh_completed(&mut self, ticket: RefreshTicket, tree: Vec<Node>) -> Outcome {
        if ticket.0 != self.generation {
            treecombo_core::warn!(
                ticket = ticket.0,
                latest = self.generation,
                "stale refresh discarded"
            );
            return Outcome::default();
        }
        self.install(tree)
    }

    // --- internals ---------------------------------------------------------

    fn set_text(&mut self, value: String, caret: usize) {
        self.caret = caret.min(splice::grapheme_len(&value));
        self.value = value;
        self.pending_caret = None;
        self.term = self.compute_term();
    }

    fn compute_term(&self) -> String {
        match self.config.search_scope() {
            SearchScope::WholeValue => self.value.clone(),
            SearchScope::ActiveToken => splice::active_token(&self.value, self.caret).to_owned(),
        }
    }

    /// Re-derive the view from the source tree (local mode).
    fn refilter(&mut self) {
        let result = filter::filter(&self.source, &self.term);
        self.view = result.tree;
        if let Some(ids) = result.auto_expand {
            self.expansion.replace(ids);
        }
    }

    fn focus_first_match(&mut self) {
        if !self.config.focus_first_match() {
            return;
        }
        if let Some(node) = filter::first_match(&self.view, &self.term) {
            let id = node.id().to_owned();
            self.nav.set_focus(Some(id));
        }
    }

    fn force_open(&mut self) -> Outcome {
        let mut actions = Vec::new();
        match self.config.filter_mode() {
            FilterMode::Local => self.refilter(),
            FilterMode::Remote => actions.push(self.refresh_action()),
        }
        self.nav.set_focus(None);
        let commands = self.nav.take_control(&self.view, &self.expansion);
        self.emit(commands, &mut actions);

        treecombo_core::debug!(
            term = %self.term,
            focused = ?self.nav.focused(),
            "dropdown forced open"
        );
        Outcome {
            consumed: true,
            actions,
        }
    }

    fn refresh_action(&mut self) -> ComboAction {
        let ticket = self.request_refresh();
        ComboAction::RefreshRequested {
            term: self.term.clone(),
            ticket,
        }
    }

    fn install(&mut self, tree: Vec<Node>) -> Outcome {
        self.source = tree;
        self.expansion.refreeze(&self.source);
        if self
            .selected
            .as_deref()
            .is_some_and(|id| tree::find_node(id, &self.source).is_none())
        {
            self.selected = None;
        }
        match self.config.filter_mode() {
            FilterMode::Local => self.refilter(),
            FilterMode::Remote => {
                self.view = self.source.clone();
                if !self.term.is_empty() {
                    self.expansion.replace(tree::expandable_ids(&self.view));
                    if self.reveal_pending {
                        self.focus_first_match();
                    }
                }
            }
        }
        self.nav.reconcile(&self.view, &self.expansion);

        let mut actions = Vec::new();
        if self.reveal_pending || self.nav.is_visible() {
            self.reveal_pending = false;
            let visibility = self.nav.show(!self.view.is_empty());
            self.emit(visibility, &mut actions);
        }

        treecombo_core::debug!(
            generation = self.generation,
            rows = self.view.len(),
            "tree installed"
        );
        Outcome::from_actions(actions)
    }

    fn commit(&mut self, id: &str, key: CommitKey, actions: &mut Vec<ComboAction>) {
        let Some(node) = tree::find_node(id, &self.source)
            .or_else(|| tree::find_node(id, &self.view))
            .cloned()
        else {
            treecombo_core::warn!(id, "commit of unknown node ignored");
            return;
        };
        let path: Vec<Node> = tree::build_path(id, &self.source)
            .into_iter()
            .cloned()
            .collect();

        let spliced = splice::splice(&self.value, self.caret, node.label());
        self.value = spliced.value;
        self.caret = spliced.caret;
        self.pending_caret = Some(spliced.caret);
        self.term = self.compute_term();
        self.selected = Some(node.id().to_owned());
        self.reveal_pending = false;

        treecombo_core::info!(id, key = ?key, caret = self.caret, "selection committed");
        actions.push(ComboAction::ValueChanged {
            value: self.value.clone(),
            caret: self.caret,
        });
        actions.push(ComboAction::SelectionCommitted { node, path, key });

        // The dropdown stays closed; the next view is derived from the new term.
        match self.config.filter_mode() {
            FilterMode::Local => self.refilter(),
            FilterMode::Remote => actions.push(self.refresh_action()),
        }
    }

    fn emit(
        &mut self,
        commands: impl IntoIterator<Item = NavCommand>,
        actions: &mut Vec<ComboAction>,
    ) {
        for command in commands {
            match command {
                NavCommand::Commit { id, key } => self.commit(&id, key, actions),
                NavCommand::Expanded(id) => {
                    treecombo_core::debug!(id = %id, "branch expanded");
                    actions.push(ComboAction::NodeExpanded(id));
                }
                NavCommand::Collapsed(id) => {
                    treecombo_core::debug!(id = %id, "branch collapsed");
                    actions.push(ComboAction::NodeCollapsed(id));
                }
                NavCommand::ControlTransferred => {
                    actions.push(ComboAction::ControlTransferredToField);
                }
                NavCommand::Quit => {
                    self.reveal_pending = false;
                    actions.push(ComboAction::QuitRequested);
                }
                NavCommand::VisibilityChanged(visible) => {
                    if !visible {
                        self.reveal_pending = false;
                    }
                    actions.push(ComboAction::DropdownVisibilityChanged(visible));
                }
            }
        }
    }
}
