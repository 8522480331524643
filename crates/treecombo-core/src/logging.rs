#![forbid(unsafe_code)]

//! Logging support.
//!
//! With the `tracing` feature enabled this module re-exports the `tracing`
//! event macros the engine uses. Without it, no-op macros with the same names
//! are exported at the crate root so call sites compile unchanged and cost
//! nothing.
//!
//! Engine code always logs through the crate-root path:
//!
//! ```
//! let term = "men";
//! treecombo_core::debug!(term, "search term applied");
//! ```

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op debug macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op info macro when tracing is disabled.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// No-op trace macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op warn macro when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}
