//! The position-evaluation capability the game walk depends on.
//!
//! An [`Oracle`] answers "how good is this position for White?" for a FEN
//! and a [`SearchLimit`]. Sessions are opened through an [`OracleProvider`]
//! and released when dropped.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::evaluation::Evaluation;

/// Errors that can occur while talking to an evaluation oracle.
#[derive(Error, Debug)]
pub enum OracleError {
    /// Failed to spawn or talk to the engine process.
    #[error("Engine I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Engine executable was not found at the specified path.
    #[error("Engine not found at path: {0}")]
    NotFound(String),
    /// Engine failed to initialize properly (UCI handshake failed).
    #[error("Engine initialization failed")]
    HandshakeFailed,
    /// Engine returned an invalid or unexpected response.
    #[error("Invalid engine response: {0}")]
    InvalidResponse(String),
    /// The engine closed its output stream.
    #[error("Engine closed unexpectedly")]
    Closed,
    /// The search limit cannot be honored.
    #[error("Invalid search limit: {0}")]
    InvalidLimit(SearchLimit),
}

/// How much effort the oracle may spend on one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchLimit {
    /// Search to a fixed depth in plies.
    Depth(u32),
    /// Search for a fixed time in milliseconds.
    MoveTime(u64),
    /// Search a fixed number of nodes.
    Nodes(u64),
}

impl SearchLimit {
    /// Rejects limits that would make the oracle return immediately.
    pub fn validate(self) -> Result<Self, OracleError> {
        let zero = match self {
            SearchLimit::Depth(d) => d == 0,
            SearchLimit::MoveTime(ms) => ms == 0,
            SearchLimit::Nodes(n) => n == 0,
        };
        if zero {
            Err(OracleError::InvalidLimit(self))
        } else {
            Ok(self)
        }
    }
}

impl Default for SearchLimit {
    fn default() -> Self {
        SearchLimit::Depth(18)
    }
}

/// Formats as the arguments of a UCI `go` command.
impl fmt::Display for SearchLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchLimit::Depth(d) => write!(f, "depth {}", d),
            SearchLimit::MoveTime(ms) => write!(f, "movetime {}", ms),
            SearchLimit::Nodes(n) => write!(f, "nodes {}", n),
        }
    }
}

/// A live evaluation session.
pub trait Oracle {
    /// Evaluates a position, returning a white-positive score.
    fn evaluate(&mut self, fen: &str, limit: SearchLimit) -> Result<Evaluation, OracleError>;

    /// Resets per-game state before a new walk.
    fn new_game(&mut self) -> Result<(), OracleError> {
        Ok(())
    }
}

impl<O: Oracle + ?Sized> Oracle for &mut O {
    fn evaluate(&mut self, fen: &str, limit: SearchLimit) -> Result<Evaluation, OracleError> {
        (**self).evaluate(fen, limit)
    }

    fn new_game(&mut self) -> Result<(), OracleError> {
        (**self).new_game()
    }
}

impl<O: Oracle + ?Sized> Oracle for Box<O> {
    fn evaluate(&mut self, fen: &str, limit: SearchLimit) -> Result<Evaluation, OracleError> {
        (**self).evaluate(fen, limit)
    }

    fn new_game(&mut self) -> Result<(), OracleError> {
        (**self).new_game()
    }
}

/// Opens oracle sessions; each session is terminated when dropped.
pub trait OracleProvider: Send + Sync {
    type Session: Oracle;

    fn open_session(&self) -> Result<Self::Session, OracleError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_validation() {
        assert!(SearchLimit::Depth(18).validate().is_ok());
        assert!(SearchLimit::MoveTime(100).validate().is_ok());
        assert!(matches!(
            SearchLimit::Depth(0).validate(),
            Err(OracleError::InvalidLimit(SearchLimit::Depth(0)))
        ));
        assert!(SearchLimit::Nodes(0).validate().is_err());
    }

    #[test]
    fn test_limit_go_arguments() {
        assert_eq!(SearchLimit::Depth(12).to_string(), "depth 12");
        assert_eq!(SearchLimit::MoveTime(500).to_string(), "movetime 500");
        assert_eq!(SearchLimit::Nodes(1_000).to_string(), "nodes 1000");
        assert_eq!(SearchLimit::default(), SearchLimit::Depth(18));
    }

    #[test]
    fn test_error_display() {
        assert!(OracleError::NotFound("/x/sf".into()).to_string().contains("/x/sf"));
        assert_eq!(
            OracleError::InvalidLimit(SearchLimit::Depth(0)).to_string(),
            "Invalid search limit: depth 0"
        );
    }
}
