// License: MIT

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An event was rejected because it is invalid in the current phase.
    ///
    /// Examples:
    /// - redirect requested while the session is still active
    InvalidState(StateError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    NotLockedDown,
}

// ---------------- Display ----------------

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidState(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::NotLockedDown =>
                write!(f, "session is still active; nothing to redirect from"),
        }
    }
}

impl std::error::Error for Error {}
