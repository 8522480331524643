//! Construction-time configuration for a [`TreeCombobox`](crate::combobox::TreeCombobox).

use treecombo_core::event::KeyCode;

/// Which part of the input value is used as the search term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchScope {
    /// The whole input value.
    #[default]
    WholeValue,
    /// Only the active token before the caret.
    ActiveToken,
}

/// Who filters the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterMode {
    /// The engine filters the host's full tree on every text change.
    #[default]
    Local,
    /// The host fetches trees that are already filtered; the engine asks for
    /// them with `RefreshRequested` and displays what it is given.
    Remote,
}

/// Combobox configuration.
///
/// # Example
///
/// ```
/// use treecombo::config::{ComboboxConfig, SearchScope};
/// use treecombo_core::event::KeyCode;
///
/// let config = ComboboxConfig::default()
///     .with_max_results(25)
///     .with_select_key(KeyCode::Char(';'))
///     .with_search_scope(SearchScope::ActiveToken);
/// assert_eq!(config.max_results(), 25);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ComboboxConfig {
    default_expanded: bool,
    max_results: usize,
    select_keys: Vec<KeyCode>,
    search_scope: SearchScope,
    filter_mode: FilterMode,
    focus_first_match: bool,
}

impl Default for ComboboxConfig {
    fn default() -> Self {
        Self {
            default_expanded: false,
            max_results: 10,
            select_keys: Vec::new(),
            search_scope: SearchScope::default(),
            filter_mode: FilterMode::default(),
            focus_first_match: false,
        }
    }
}

impl ComboboxConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock every branch open and disable collapsing (builder).
    #[must_use]
    pub fn with_default_expanded(mut self, on: bool) -> Self {
        self.default_expanded = on;
        self
    }

    /// Advisory cap on rendered rows (builder). Not applied by filtering.
    #[must_use]
    pub fn with_max_results(mut self, n: usize) -> Self {
        self.max_results = n;
        self
    }

    /// Add an extra commit key (builder).
    ///
    /// Keys the navigation already owns (arrows, Enter, Tab, Escape, Space)
    /// are ignored.
    #[must_use]
    pub fn with_select_key(mut self, key: KeyCode) -> Self {
        if !is_reserved(key) && !self.select_keys.contains(&key) {
            self.select_keys.push(key);
        }
        self
    }

    /// Set the search scope (builder).
    #[must_use]
    pub fn with_search_scope(mut self, scope: SearchScope) -> Self {
        self.search_scope = scope;
        self
    }

    /// Set the filter mode (builder).
    #[must_use]
    pub fn with_filter_mode(mut self, mode: FilterMode) -> Self {
        self.filter_mode = mode;
        self
    }

    /// Point focus at the first direct match after each text change (builder).
    #[must_use]
    pub fn with_focus_first_match(mut self, on: bool) -> Self {
        self.focus_first_match = on;
        self
    }

    /// Whether expansion is frozen open.
    #[must_use]
    pub fn default_expanded(&self) -> bool {
        self.default_expanded
    }

    /// Advisory row cap for the renderer.
    #[must_use]
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Extra commit keys.
    #[must_use]
    pub fn select_keys(&self) -> &[KeyCode] {
        &self.select_keys
    }

    /// Whether `key` is one of the extra commit keys.
    #[must_use]
    pub fn is_select_key(&self, key: KeyCode) -> bool {
        !is_reserved(key) && self.select_keys.contains(&key)
    }

    /// Search scope.
    #[must_use]
    pub fn search_scope(&self) -> SearchScope {
        self.search_scope
    }

    /// Filter mode.
    #[must_use]
    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    /// Whether text changes pre-focus the first match.
    #[must_use]
    pub fn focus_first_match(&self) -> bool {
        self.focus_first_match
    }
}

fn is_reserved(key: KeyCode) -> bool {
    matches!(
        key,
        KeyCode::Up
            | KeyCode::Down
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Enter
            | KeyCode::Tab
            | KeyCode::Escape
            | KeyCode::Null
            | KeyCode::Char(' ')
    )
}
