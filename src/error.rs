//! Error types
//!
//! Nothing in this crate is fatal: every variant is recoverable and the
//! session keeps running (or keeps its in-memory results) when one occurs.

use thiserror::Error;

use crate::sim::{SessionStatus, TargetId};

#[derive(Debug, Error)]
pub enum GameError {
    /// Target was already hit, already expired, or never existed
    #[error("target {0} already resolved")]
    AlreadyResolved(TargetId),

    /// Lifecycle action requested from a status that does not allow it
    #[error("cannot {action} while {status:?}")]
    InvalidTransition {
        action: &'static str,
        status: SessionStatus,
    },

    /// Leaderboard or settings storage could not be read or written
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<std::io::Error> for GameError {
    fn from(err: std::io::Error) -> Self {
        GameError::StorageUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::StorageUnavailable(format!("malformed data: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
