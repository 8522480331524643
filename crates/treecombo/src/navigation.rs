#![forbid(unsafe_code)]

//! Keyboard navigation state machine.
//!
//! ```text
//!              ArrowDown / force-open
//!   Closed ──────────────────────────────▶ OpenControlled
//!     ▲  ▲                                  │     ▲
//!     │  │        Enter / Tab (commit)      │     │ ArrowDown / force-open
//!     │  └──────────────────────────────────┤     │
//!     │                              Escape ▼     │
//!     └─────────── Escape ─────────── OpenUncontrolled
//! ```
//!
//! Typing always demotes `OpenControlled` to `OpenUncontrolled`: the text
//! field owns the arrow keys again until the user deliberately moves into
//! the list.
//!
//! The machine does not own the tree or the expansion set. Both are passed
//! in on every call, so one implementation serves hosts that keep expansion
//! locally and hosts that receive it from elsewhere.
//!
//! # Invariants
//!
//! 1. `controlled` implies `visible`.
//! 2. After [`NavigationState::reconcile`], `focused` is `None` or the id of
//!    a node on a visible row of the current view.

use treecombo_core::event::{KeyCode, KeyEvent};

use crate::config::ComboboxConfig;
use crate::expansion::ExpansionSet;
use crate::node::Node;
use crate::tree;

/// Coarse dropdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropdownState {
    /// Dropdown hidden.
    Closed,
    /// Dropdown shown; keys belong to the text field.
    OpenUncontrolled,
    /// Dropdown shown; arrow keys move row focus.
    OpenControlled,
}

/// What confirmed a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitKey {
    /// Enter key.
    Enter,
    /// Tab key.
    Tab,
    /// Pointer click on a row.
    Click,
    /// A configured extra select key.
    Custom(KeyCode),
}

/// Side effect requested by a navigation step, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavCommand {
    /// Commit the node with this id.
    Commit {
        /// Id of the focused node.
        id: String,
        /// The key that confirmed it.
        key: CommitKey,
    },
    /// A branch was opened.
    Expanded(String),
    /// A branch was closed.
    Collapsed(String),
    /// Keyboard control went back to the text field.
    ControlTransferred,
    /// The user asked to leave the widget.
    Quit,
    /// Dropdown visibility flipped.
    VisibilityChanged(bool),
}

/// Result of feeding one key to the machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyResult {
    /// Whether the key was used and must not reach the text field.
    pub consumed: bool,
    /// Effects, in order.
    pub commands: Vec<NavCommand>,
}

impl KeyResult {
    fn ignored() -> Self {
        Self::default()
    }

    fn consumed(commands: Vec<NavCommand>) -> Self {
        Self {
            consumed: true,
            commands,
        }
    }
}

/// Focus and dropdown state of one combobox.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    focused: Option<String>,
    visible: bool,
    controlled: bool,
}

impl NavigationState {
    /// Closed, nothing focused.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the focused node.
    #[must_use]
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Whether the dropdown is shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether arrow keys drive row focus.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    /// Current coarse state.
    #[must_use]
    pub fn state(&self) -> DropdownState {
        match (self.visible, self.controlled) {
            (false, _) => DropdownState::Closed,
            (true, false) => DropdownState::OpenUncontrolled,
            (true, true) => DropdownState::OpenControlled,
        }
    }

    /// Point focus somewhere (or nowhere). Callers reconcile afterwards.
    pub fn set_focus(&mut self, id: Option<String>) {
        self.focused = id;
    }

    /// Handle one key.
    ///
    /// Ctrl+Space is not handled here: forcing the dropdown open needs a
    /// fresh filter pass, which the owner runs before calling
    /// [`NavigationState::take_control`].
    pub fn handle_key(
        &mut self,
        key: &KeyEvent,
        view: &[Node],
        expansion: &mut ExpansionSet,
        config: &ComboboxConfig,
    ) -> KeyResult {
        if !key.is_actionable() {
            return KeyResult::ignored();
        }

        if !self.visible {
            return match key.code {
                KeyCode::Down => {
                    self.focused = None;
                    KeyResult::consumed(self.take_control(view, expansion))
                }
                KeyCode::Escape => KeyResult::consumed(vec![NavCommand::Quit]),
                _ => KeyResult::ignored(),
            };
        }

        if key.code == KeyCode::Escape {
            return KeyResult::consumed(self.escape());
        }

        if !self.controlled {
            return match key.code {
                KeyCode::Down => KeyResult::consumed(self.take_control(view, expansion)),
                _ => KeyResult::ignored(),
            };
        }

        match key.code {
            KeyCode::Down => {
                self.focus_next(view, expansion);
                KeyResult::consumed(Vec::new())
            }
            KeyCode::Up => {
                self.focus_previous(view, expansion);
                KeyResult::consumed(Vec::new())
            }
            KeyCode::Right => KeyResult::consumed(self.go_deeper(view, expansion)),
            KeyCode::Left => KeyResult::consumed(self.go_up(view, expansion)),
            KeyCode::Enter => self.commit_key(view, expansion, CommitKey::Enter),
            KeyCode::Tab => self.commit_key(view, expansion, CommitKey::Tab),
            code if config.is_select_key(code) => {
                self.commit_key(view, expansion, CommitKey::Custom(code))
            }
            _ => KeyResult::ignored(),
        }
    }

    /// Show the dropdown and hand the arrow keys to it.
    ///
    /// Focus stays where it is if that row is still visible, otherwise it
    /// moves to the first visible row (or nowhere for an empty view).
    pub fn take_control(&mut self, view: &[Node], expansion: &ExpansionSet) -> Vec<NavCommand> {
        let mut commands = Vec::new();
        if let Some(cmd) = self.show(true) {
            commands.push(cmd);
        }
        self.controlled = true;

        let keep = self
            .focused
            .as_deref()
            .is_some_and(|id| tree::is_visible(id, view, expansion));
        if !keep {
            self.focused = tree::flatten_visible(view, expansion)
                .first()
                .map(|node| node.id().to_owned());
        }
        commands
    }

    /// Give the arrow keys back to the text field without touching focus.
    pub fn release_control(&mut self) {
        self.controlled = false;
    }

    /// Set visibility. Hiding also releases control. Returns the change
    /// event when visibility flipped.
    pub fn show(&mut self, visible: bool) -> Option<NavCommand> {
        if !visible {
            self.controlled = false;
        }
        if self.visible == visible {
            return None;
        }
        self.visible = visible;
        Some(NavCommand::VisibilityChanged(visible))
    }

    /// Escape: controlled → uncontrolled, otherwise close and quit.
    pub fn escape(&mut self) -> Vec<NavCommand> {
        if self.controlled {
            self.controlled = false;
            self.focused = None;
            return vec![NavCommand::ControlTransferred];
        }
        let mut commands = vec![NavCommand::Quit];
        commands.extend(self.show(false));
        commands
    }

    /// Move focus to the next visible row, wrapping to the first.
    pub fn focus_next(&mut self, view: &[Node], expansion: &ExpansionSet) {
        let visible = tree::flatten_visible(view, expansion);
        if visible.is_empty() {
            self.focused = None;
            return;
        }
        let next = match self.position_in(&visible) {
            Some(idx) => (idx + 1) % visible.len(),
            None => 0,
        };
        self.focused = Some(visible[next].id().to_owned());
    }

    /// Move focus to the previous visible row, wrapping to the last.
    /// No-op while the dropdown is hidden.
    pub fn focus_previous(&mut self, view: &[Node], expansion: &ExpansionSet) {
        if !self.visible {
            return;
        }
        let visible = tree::flatten_visible(view, expansion);
        if visible.is_empty() {
            self.focused = None;
            return;
        }
        let prev = match self.position_in(&visible) {
            Some(0) | None => visible.len() - 1,
            Some(idx) => idx - 1,
        };
        self.focused = Some(visible[prev].id().to_owned());
    }

    /// Open the focused branch and focus its first child.
    ///
    /// With frozen expansion nothing is opened but focus still descends.
    pub fn go_deeper(&mut self, view: &[Node], expansion: &mut ExpansionSet) -> Vec<NavCommand> {
        let Some(node) = self.focused_visible_node(view, expansion) else {
            return Vec::new();
        };
        let Some(first_child) = node.children().first() else {
            return Vec::new();
        };
        let id = node.id().to_owned();
        let first_child = first_child.id().to_owned();

        let mut commands = Vec::new();
        if expansion.expand(&id) {
            commands.push(NavCommand::Expanded(id));
        }
        if tree::is_visible(&first_child, view, expansion) {
            self.focused = Some(first_child);
        }
        commands
    }

    /// Close the focused branch if it is open, otherwise focus its parent.
    pub fn go_up(&mut self, view: &[Node], expansion: &mut ExpansionSet) -> Vec<NavCommand> {
        let Some(node) = self.focused_visible_node(view, expansion) else {
            return Vec::new();
        };
        let id = node.id().to_owned();

        if node.is_branch() && expansion.is_expanded(&id) && expansion.collapse(&id) {
            return vec![NavCommand::Collapsed(id)];
        }

        if let Some(parent) = tree::find_parent(&id, view, expansion) {
            self.focused = Some(parent.id().to_owned());
        }
        Vec::new()
    }

    /// Commit the focused row, if there is one, and close.
    pub fn commit(
        &mut self,
        view: &[Node],
        expansion: &ExpansionSet,
        key: CommitKey,
    ) -> Vec<NavCommand> {
        let Some(id) = self
            .focused_visible_node(view, expansion)
            .map(|node| node.id().to_owned())
        else {
            return Vec::new();
        };
        self.focused = None;
        let mut commands = vec![NavCommand::Commit { id, key }];
        commands.extend(self.show(false));
        commands
    }

    /// Drop focus if its row is no longer visible. Returns `true` if focus
    /// was cleared.
    pub fn reconcile(&mut self, view: &[Node], expansion: &ExpansionSet) -> bool {
        let stale = self
            .focused
            .as_deref()
            .is_some_and(|id| !tree::is_visible(id, view, expansion));
        if stale {
            self.focused = None;
        }
        stale
    }

    fn commit_key(&mut self, view: &[Node], expansion: &ExpansionSet, key: CommitKey) -> KeyResult {
        let commands = self.commit(view, expansion, key);
        if commands.is_empty() {
            KeyResult::ignored()
        } else {
            KeyResult::consumed(commands)
        }
    }

    fn position_in(&self, visible: &[&Node]) -> Option<usize> {
        let focused = self.focused.as_deref()?;
        visible.iter().position(|node| node.id() == focused)
    }

    fn focused_visible_node<'a>(
        &self,
        view: &'a [Node],
        expansion: &ExpansionSet,
    ) -> Option<&'a Node> {
        let focused = self.focused.as_deref()?;
        tree::flatten_visible(view, expansion)
            .into_iter()
            .find(|node| node.id() == focused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treecombo_core::event::{KeyEventKind, Modifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code)
    }

    fn forest() -> Vec<Node> {
        vec![
            Node::branch("a", "Alpha")
                .child(Node::branch("a1", "Alpha one").child(Node::leaf("a1x", "Deep")))
                .child(Node::leaf("a2", "Alpha two")),
            Node::leaf("b", "Beta"),
            Node::branch("c", "Empty branch"),
        ]
    }

    struct Rig {
        nav: NavigationState,
        view: Vec<Node>,
        expansion: ExpansionSet,
        config: ComboboxConfig,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                nav: NavigationState::new(),
                view: forest(),
                expansion: ExpansionSet::new(),
                config: ComboboxConfig::default(),
            }
        }

        fn frozen() -> Self {
            let view = forest();
            Self {
                nav: NavigationState::new(),
                expansion: ExpansionSet::all_expanded(&view),
                view,
                config: ComboboxConfig::default().with_default_expanded(true),
            }
        }

        fn press(&mut self, code: KeyCode) -> KeyResult {
            self.nav
                .handle_key(&key(code), &self.view, &mut self.expansion, &self.config)
        }

        fn focused(&self) -> Option<&str> {
            self.nav.focused()
        }
    }

    #[test]
    fn starts_closed() {
        let rig = Rig::new();
        assert_eq!(rig.nav.state(), DropdownState::Closed);
        assert!(rig.focused().is_none());
    }

    #[test]
    fn arrow_down_from_closed_opens_and_focuses_first() {
        let mut rig = Rig::new();
        let result = rig.press(KeyCode::Down);
        assert!(result.consumed);
        assert_eq!(result.commands, [NavCommand::VisibilityChanged(true)]);
        assert_eq!(rig.nav.state(), DropdownState::OpenControlled);
        assert_eq!(rig.focused(), Some("a"));
    }

    #[test]
    fn other_keys_while_closed_are_ignored() {
        let mut rig = Rig::new();
        for code in [KeyCode::Up, KeyCode::Left, KeyCode::Enter, KeyCode::Char('x')] {
            let result = rig.press(code);
            assert!(!result.consumed);
            assert!(result.commands.is_empty());
        }
        assert_eq!(rig.nav.state(), DropdownState::Closed);
    }

    #[test]
    fn escape_while_closed_quits() {
        let mut rig = Rig::new();
        let result = rig.press(KeyCode::Escape);
        assert_eq!(result.commands, [NavCommand::Quit]);
        assert_eq!(rig.nav.state(), DropdownState::Closed);
    }

    #[test]
    fn arrow_down_from_uncontrolled_keeps_visible_focus() {
        let mut rig = Rig::new();
        rig.nav.show(true);
        rig.nav.set_focus(Some("b".into()));
        let result = rig.press(KeyCode::Down);
        assert!(result.consumed);
        assert!(result.commands.is_empty());
        assert_eq!(rig.nav.state(), DropdownState::OpenControlled);
        assert_eq!(rig.focused(), Some("b"));
    }

    #[test]
    fn arrow_down_from_uncontrolled_replaces_hidden_focus() {
        let mut rig = Rig::new();
        rig.nav.show(true);
        rig.nav.set_focus(Some("a1x".into()));
        rig.press(KeyCode::Down);
        assert_eq!(rig.focused(), Some("a"));
    }

    #[test]
    fn uncontrolled_leaves_other_keys_to_the_field() {
        let mut rig = Rig::new();
        rig.nav.show(true);
        for code in [KeyCode::Up, KeyCode::Left, KeyCode::Right, KeyCode::Enter] {
            assert!(!rig.press(code).consumed);
        }
        assert_eq!(rig.nav.state(), DropdownState::OpenUncontrolled);
    }

    #[test]
    fn down_and_up_wrap() {
        let mut rig = Rig::new();
        rig.press(KeyCode::Down);
        assert_eq!(rig.focused(), Some("a"));
        rig.press(KeyCode::Down);
        assert_eq!(rig.focused(), Some("b"));
        rig.press(KeyCode::Down);
        assert_eq!(rig.focused(), Some("c"));
        rig.press(KeyCode::Down);
        assert_eq!(rig.focused(), Some("a"));
        rig.press(KeyCode::Up);
        assert_eq!(rig.focused(), Some("c"));
        rig.press(KeyCode::Up);
        assert_eq!(rig.focused(), Some("b"));
    }

    #[test]
    fn right_expands_and_descends() {
        let mut rig = Rig::new();
        rig.press(KeyCode::Down);
        let result = rig.press(KeyCode::Right);
        assert_eq!(result.commands, [NavCommand::Expanded("a".into())]);
        assert!(rig.expansion.is_expanded("a"));
        assert_eq!(rig.focused(), Some("a1"));

        let result = rig.press(KeyCode::Right);
        assert_eq!(result.commands, [NavCommand::Expanded("a1".into())]);
        assert_eq!(rig.focused(), Some("a1x"));
    }

    #[test]
    fn right_on_leaf_or_empty_branch_does_nothing() {
        let mut rig = Rig::new();
        rig.nav.show(true);
        rig.nav.set_focus(Some("b".into()));
        rig.press(KeyCode::Down);
        let result = rig.press(KeyCode::Right);
        assert!(result.consumed);
        assert!(result.commands.is_empty());
        assert_eq!(rig.focused(), Some("b"));

        rig.press(KeyCode::Down);
        assert_eq!(rig.focused(), Some("c"));
        assert!(rig.press(KeyCode::Right).commands.is_empty());
        assert!(!rig.expansion.is_expanded("c"));
    }

    #[test]
    fn right_on_open_branch_only_moves_focus() {
        let mut rig = Rig::new();
        rig.expansion.expand("a");
        rig.press(KeyCode::Down);
        let result = rig.press(KeyCode::Right);
        assert!(result.commands.is_empty());
        assert_eq!(rig.focused(), Some("a1"));
    }

    #[test]
    fn left_collapses_open_branch_then_climbs() {
        let mut rig = Rig::new();
        rig.press(KeyCode::Down);
        rig.press(KeyCode::Right);
        rig.press(KeyCode::Right);
        assert_eq!(rig.focused(), Some("a1x"));

        let result = rig.press(KeyCode::Left);
        assert!(result.commands.is_empty());
        assert_eq!(rig.focused(), Some("a1"));

        let result = rig.press(KeyCode::Left);
        assert_eq!(result.commands, [NavCommand::Collapsed("a1".into())]);
        assert_eq!(rig.focused(), Some("a1"));

        rig.press(KeyCode::Left);
        assert_eq!(rig.focused(), Some("a"));

        let result = rig.press(KeyCode::Left);
        assert_eq!(result.commands, [NavCommand::Collapsed("a".into())]);
        let result = rig.press(KeyCode::Left);
        assert!(result.commands.is_empty());
        assert_eq!(rig.focused(), Some("a"));
    }

    #[test]
    fn frozen_expansion_still_moves_focus() {
        let mut rig = Rig::frozen();
        rig.press(KeyCode::Down);
        assert_eq!(rig.focused(), Some("a"));
        assert!(rig.press(KeyCode::Right).commands.is_empty());
        assert_eq!(rig.focused(), Some("a1"));
        assert!(rig.press(KeyCode::Left).commands.is_empty());
        assert_eq!(rig.focused(), Some("a"));
        assert!(rig.expansion.is_expanded("a"));
    }

    #[test]
    fn enter_commits_and_closes() {
        let mut rig = Rig::new();
        rig.press(KeyCode::Down);
        rig.press(KeyCode::Down);
        let result = rig.press(KeyCode::Enter);
        assert!(result.consumed);
        assert_eq!(
            result.commands,
            [
                NavCommand::Commit {
                    id: "b".into(),
                    key: CommitKey::Enter
                },
                NavCommand::VisibilityChanged(false),
            ]
        );
        assert_eq!(rig.nav.state(), DropdownState::Closed);
        assert!(rig.focused().is_none());
    }

    #[test]
    fn tab_and_custom_keys_commit() {
        let mut rig = Rig::new();
        rig.press(KeyCode::Down);
        let result = rig.press(KeyCode::Tab);
        assert!(matches!(
            result.commands.first(),
            Some(NavCommand::Commit { key: CommitKey::Tab, .. })
        ));

        let mut rig = Rig::new();
        rig.config = ComboboxConfig::default().with_select_key(KeyCode::Char(';'));
        rig.press(KeyCode::Down);
        let result = rig.press(KeyCode::Char(';'));
        assert!(matches!(
            result.commands.first(),
            Some(NavCommand::Commit { key: CommitKey::Custom(KeyCode::Char(';')), .. })
        ));
    }

    #[test]
    fn enter_without_focus_is_noop() {
        let mut rig = Rig::new();
        rig.view.clear();
        rig.press(KeyCode::Down);
        assert!(rig.focused().is_none());
        let result = rig.press(KeyCode::Enter);
        assert!(!result.consumed);
        assert!(result.commands.is_empty());
        assert_eq!(rig.nav.state(), DropdownState::OpenControlled);
    }

    #[test]
    fn escape_controlled_hands_back_control() {
        let mut rig = Rig::new();
        rig.press(KeyCode::Down);
        let result = rig.press(KeyCode::Escape);
        assert_eq!(result.commands, [NavCommand::ControlTransferred]);
        assert_eq!(rig.nav.state(), DropdownState::OpenUncontrolled);
        assert!(rig.focused().is_none());

        let result = rig.press(KeyCode::Escape);
        assert_eq!(
            result.commands,
            [NavCommand::Quit, NavCommand::VisibilityChanged(false)]
        );
        assert_eq!(rig.nav.state(), DropdownState::Closed);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut rig = Rig::new();
        let released = key(KeyCode::Down).with_kind(KeyEventKind::Release);
        let result = rig
            .nav
            .handle_key(&released, &rig.view, &mut rig.expansion, &rig.config);
        assert!(!result.consumed);
        assert_eq!(rig.nav.state(), DropdownState::Closed);
    }

    #[test]
    fn modified_arrows_still_navigate() {
        let mut rig = Rig::new();
        let shifted = key(KeyCode::Down).with_modifiers(Modifiers::SHIFT);
        rig.nav
            .handle_key(&shifted, &rig.view, &mut rig.expansion, &rig.config);
        assert_eq!(rig.nav.state(), DropdownState::OpenControlled);
    }

    #[test]
    fn reconcile_drops_hidden_focus() {
        let mut rig = Rig::new();
        rig.expansion.expand("a");
        rig.nav.set_focus(Some("a2".into()));
        assert!(!rig.nav.reconcile(&rig.view, &rig.expansion));
        rig.expansion.collapse("a");
        assert!(rig.nav.reconcile(&rig.view, &rig.expansion));
        assert!(rig.nav.focused().is_none());
    }

    #[test]
    fn hiding_releases_control() {
        let mut rig = Rig::new();
        rig.press(KeyCode::Down);
        assert_eq!(rig.nav.show(false), Some(NavCommand::VisibilityChanged(false)));
        assert!(!rig.nav.is_controlled());
        assert_eq!(rig.nav.show(false), None);
    }
}
