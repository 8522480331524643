#![forbid(unsafe_code)]

//! Core: key events and logging shims shared by the treecombo crates.

pub mod event;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, info, trace, warn};

pub use event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};
