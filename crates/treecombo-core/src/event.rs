#![forbid(unsafe_code)]

//! Canonical key event types.
//!
//! The combobox engine is driven by keystrokes that a host input widget
//! forwards to it. This module defines the host-independent vocabulary for
//! those keystrokes. All events derive `Clone`, `PartialEq`, and `Eq` for use
//! in tests and pattern matching.
//!
//! # Design Notes
//!
//! - `KeyEventKind` defaults to `Press` when the host cannot distinguish it
//! - `Modifiers` use bitflags for easy combination
//! - Terminals report Ctrl+Space as [`KeyCode::Null`]; [`KeyEvent::is_ctrl_space`]
//!   accepts both spellings

use bitflags::bitflags;
#[cfg(feature = "crossterm")]
use crossterm::event as cte;

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Convert a Crossterm key event into a [`KeyEvent`].
    ///
    /// Returns `None` for keys the engine has no vocabulary for
    /// (media keys, lock keys, bare modifier presses).
    #[must_use]
    #[cfg(feature = "crossterm")]
    pub fn from_crossterm(event: cte::KeyEvent) -> Option<Self> {
        let code = map_key_code(event.code)?;
        Some(Self {
            code,
            modifiers: map_modifiers(event.modifiers),
            kind: map_key_kind(event.kind),
        })
    }

    /// Whether the event should be acted on (presses and auto-repeats).
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        !matches!(self.kind, KeyEventKind::Release)
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Alt modifier is held.
    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Check if Shift modifier is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Ctrl+Space, however the host spelled it.
    #[must_use]
    pub fn is_ctrl_space(&self) -> bool {
        match self.code {
            KeyCode::Null => true,
            KeyCode::Char(' ') => self.ctrl(),
            _ => false,
        }
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyCode {
    /// A regular character key.
    Char(char),

    /// Enter/Return key.
    Enter,

    /// Escape key.
    Escape,

    /// Backspace key.
    Backspace,

    /// Tab key.
    Tab,

    /// Shift+Tab (back-tab).
    BackTab,

    /// Delete key.
    Delete,

    /// Home key.
    Home,

    /// End key.
    End,

    /// Page Up key.
    PageUp,

    /// Page Down key.
    PageDown,

    /// Up arrow key.
    Up,

    /// Down arrow key.
    Down,

    /// Left arrow key.
    Left,

    /// Right arrow key.
    Right,

    /// Function key (F1-F24).
    F(u8),

    /// Null character (Ctrl+Space or Ctrl+@).
    Null,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(feature = "crossterm")]
fn map_key_kind(kind: cte::KeyEventKind) -> KeyEventKind {
    match kind {
        cte::KeyEventKind::Press => KeyEventKind::Press,
        cte::KeyEventKind::Repeat => KeyEventKind::Repeat,
        cte::KeyEventKind::Release => KeyEventKind::Release,
    }
}

#[cfg(feature = "crossterm")]
fn map_key_code(code: cte::KeyCode) -> Option<KeyCode> {
    match code {
        cte::KeyCode::Backspace => Some(KeyCode::Backspace),
        cte::KeyCode::Enter => Some(KeyCode::Enter),
        cte::KeyCode::Left => Some(KeyCode::Left),
        cte::KeyCode::Right => Some(KeyCode::Right),
        cte::KeyCode::Up => Some(KeyCode::Up),
        cte::KeyCode::Down => Some(KeyCode::Down),
        cte::KeyCode::Home => Some(KeyCode::Home),
        cte::KeyCode::End => Some(KeyCode::End),
        cte::KeyCode::PageUp => Some(KeyCode::PageUp),
        cte::KeyCode::PageDown => Some(KeyCode::PageDown),
        cte::KeyCode::Tab => Some(KeyCode::Tab),
        cte::KeyCode::BackTab => Some(KeyCode::BackTab),
        cte::KeyCode::Delete => Some(KeyCode::Delete),
        cte::KeyCode::F(n) => Some(KeyCode::F(n)),
        cte::KeyCode::Char(c) => Some(KeyCode::Char(c)),
        cte::KeyCode::Null => Some(KeyCode::Null),
        cte::KeyCode::Esc => Some(KeyCode::Escape),
        _ => None,
    }
}

#[cfg(feature = "crossterm")]
fn map_modifiers(modifiers: cte::KeyModifiers) -> Modifiers {
    let mut mapped = Modifiers::NONE;
    if modifiers.contains(cte::KeyModifiers::SHIFT) {
        mapped |= Modifiers::SHIFT;
    }
    if modifiers.contains(cte::KeyModifiers::ALT) {
        mapped |= Modifiers::ALT;
    }
    if modifiers.contains(cte::KeyModifiers::CONTROL) {
        mapped |= Modifiers::CTRL;
    }
    if modifiers.contains(cte::KeyModifiers::SUPER)
        || modifiers.contains(cte::KeyModifiers::HYPER)
        || modifiers.contains(cte::KeyModifiers::META)
    {
        mapped |= Modifiers::SUPER;
    }
    mapped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_space_both_spellings() {
        assert!(KeyEvent::new(KeyCode::Null).is_ctrl_space());
        assert!(
            KeyEvent::new(KeyCode::Char(' '))
                .with_modifiers(Modifiers::CTRL)
                .is_ctrl_space()
        );
        assert!(!KeyEvent::new(KeyCode::Char(' ')).is_ctrl_space());
        assert!(
            !KeyEvent::new(KeyCode::Char('a'))
                .with_modifiers(Modifiers::CTRL)
                .is_ctrl_space()
        );
    }

    #[test]
    fn release_is_not_actionable() {
        let press = KeyEvent::new(KeyCode::Down);
        assert!(press.is_actionable());
        assert!(press.with_kind(KeyEventKind::Repeat).is_actionable());
        assert!(!press.with_kind(KeyEventKind::Release).is_actionable());
    }

    #[test]
    fn modifiers_default_is_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
        let event = KeyEvent::new(KeyCode::Enter);
        assert!(!event.ctrl());
        assert!(!event.alt());
        assert!(!event.shift());
    }

    #[cfg(feature = "crossterm")]
    mod crossterm_mapping {
        use super::super::*;
        use crossterm::event as ct_event;

        #[test]
        fn maps_escape_and_arrows() {
            let esc = ct_event::KeyEvent::new(ct_event::KeyCode::Esc, ct_event::KeyModifiers::NONE);
            assert_eq!(
                KeyEvent::from_crossterm(esc).map(|k| k.code),
                Some(KeyCode::Escape)
            );

            let down =
                ct_event::KeyEvent::new(ct_event::KeyCode::Down, ct_event::KeyModifiers::NONE);
            assert_eq!(
                KeyEvent::from_crossterm(down).map(|k| k.code),
                Some(KeyCode::Down)
            );
        }

        #[test]
        fn maps_ctrl_space() {
            let event = ct_event::KeyEvent::new(
                ct_event::KeyCode::Char(' '),
                ct_event::KeyModifiers::CONTROL,
            );
            let mapped = KeyEvent::from_crossterm(event).expect("mapped");
            assert!(mapped.is_ctrl_space());
        }

        #[test]
        fn maps_modifier_combination() {
            let event = ct_event::KeyEvent::new(
                ct_event::KeyCode::Char('x'),
                ct_event::KeyModifiers::CONTROL | ct_event::KeyModifiers::ALT,
            );
            let mapped = KeyEvent::from_crossterm(event).expect("mapped");
            assert!(mapped.ctrl());
            assert!(mapped.alt());
            assert!(!mapped.shift());
        }

        #[test]
        fn unmapped_keys_are_dropped() {
            let event = ct_event::KeyEvent::new(
                ct_event::KeyCode::CapsLock,
                ct_event::KeyModifiers::NONE,
            );
            assert!(KeyEvent::from_crossterm(event).is_none());
        }
    }
}
