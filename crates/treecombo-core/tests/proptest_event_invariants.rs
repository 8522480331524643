//! Property-based invariant tests for key events.
//!
//! 1. Modifier accessors agree with the bitflags.
//! 2. Ctrl+Space detection depends only on code and CTRL.
//! 3. Only releases are non-actionable.
//! 4. Crossterm character keys keep their char and modifiers.

use proptest::prelude::*;
use treecombo_core::event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};

// ── Helpers ─────────────────────────────────────────────────────────────

fn modifiers_strategy() -> impl Strategy<Value = Modifiers> {
    (0u8..16).prop_map(Modifiers::from_bits_truncate)
}

fn kind_strategy() -> impl Strategy<Value = KeyEventKind> {
    prop_oneof![
        Just(KeyEventKind::Press),
        Just(KeyEventKind::Repeat),
        Just(KeyEventKind::Release),
    ]
}

fn code_strategy() -> impl Strategy<Value = KeyCode> {
    prop_oneof![
        any::<char>().prop_map(KeyCode::Char),
        Just(KeyCode::Char(' ')),
        Just(KeyCode::Null),
        Just(KeyCode::Enter),
        Just(KeyCode::Escape),
        Just(KeyCode::Up),
        Just(KeyCode::Down),
        (1u8..=12).prop_map(KeyCode::F),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Accessors
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn accessors_match_flags(code in code_strategy(), mods in modifiers_strategy()) {
        let event = KeyEvent::new(code).with_modifiers(mods);
        prop_assert_eq!(event.ctrl(), mods.contains(Modifiers::CTRL));
        prop_assert_eq!(event.alt(), mods.contains(Modifiers::ALT));
        prop_assert_eq!(event.shift(), mods.contains(Modifiers::SHIFT));
    }

    #[test]
    fn ctrl_space_detection(code in code_strategy(), mods in modifiers_strategy()) {
        let event = KeyEvent::new(code).with_modifiers(mods);
        let expected = code == KeyCode::Null
            || (code == KeyCode::Char(' ') && mods.contains(Modifiers::CTRL));
        prop_assert_eq!(event.is_ctrl_space(), expected);
    }

    #[test]
    fn only_release_is_ignored(code in code_strategy(), kind in kind_strategy()) {
        let event = KeyEvent::new(code).with_kind(kind);
        prop_assert_eq!(event.is_actionable(), kind != KeyEventKind::Release);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Crossterm mapping
// ═════════════════════════════════════════════════════════════════════════

#[cfg(feature = "crossterm")]
proptest! {
    #[test]
    fn crossterm_chars_survive(c in any::<char>(), ctrl in any::<bool>(), alt in any::<bool>()) {
        use crossterm::event as cte;

        let mut ct_mods = cte::KeyModifiers::NONE;
        let mut expected = Modifiers::NONE;
        if ctrl {
            ct_mods |= cte::KeyModifiers::CONTROL;
            expected |= Modifiers::CTRL;
        }
        if alt {
            ct_mods |= cte::KeyModifiers::ALT;
            expected |= Modifiers::ALT;
        }

        let mapped = KeyEvent::from_crossterm(cte::KeyEvent::new(cte::KeyCode::Char(c), ct_mods));
        prop_assert_eq!(
            mapped,
            Some(KeyEvent::new(KeyCode::Char(c)).with_modifiers(expected))
        );
    }
}
