//! Error type for the opt-in fallible surfaces.
//!
//! Engine operations themselves are total. Errors only come from validating
//! or parsing host data before it is handed to the engine.

use std::fmt;

/// Errors raised while accepting host data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The same id appears more than once in a forest.
    DuplicateId(String),
    /// A serialized forest could not be decoded.
    Parse(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate node id: {id}"),
            Self::Parse(msg) => write!(f, "forest parse error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Standard result type for treecombo APIs.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_id() {
        let err = Error::DuplicateId("1.2".into());
        assert_eq!(err.to_string(), "duplicate node id: 1.2");
    }
}
