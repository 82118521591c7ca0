//! Error types for the fusion and dialogue core.
//!
//! `NotFound` and `IndexUnavailable` must stay distinguishable: an empty
//! result from a healthy index is `Ok(vec![])`, never an error, and a failing
//! index is never reported as an empty result.

use std::fmt;

use thiserror::Error;

/// Which Document Index call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexCall {
    Search,
    GetById,
    ListByTag,
}

impl fmt::Display for IndexCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndexCall::Search => "search",
            IndexCall::GetById => "get_by_id",
            IndexCall::ListByTag => "list_by_tag",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by the core engine.
#[derive(Debug, Error)]
pub enum FusionError {
    /// Concept or document id could not be resolved
    #[error("concept not found: {0}")]
    NotFound(String),

    /// A Document Index call failed or timed out. Not retried by the core.
    #[error("document index unavailable during {call}: {message}")]
    IndexUnavailable { call: IndexCall, message: String },

    /// Dialogue state cannot accept the requested operation
    #[error("invalid dialogue state: {0}")]
    InvalidState(String),

    /// Another turn is already in flight for this session
    #[error("session {0} is busy with another turn")]
    SessionBusy(String),
}

impl FusionError {
    /// Wrap an index client failure with the call that produced it
    pub fn index(call: IndexCall, err: anyhow::Error) -> Self {
        FusionError::IndexUnavailable {
            call,
            message: format!("{:#}", err),
        }
    }

    /// Whether the caller may treat this as a negative result rather than a failure
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FusionError::NotFound(_))
    }
}

pub type FusionResult<T> = std::result::Result<T, FusionError>;
