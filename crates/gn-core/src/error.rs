//! Framework error type.
//!
//! Sub-crates define their own error enums (`GridError`, `AgentError`, …) and
//! wrap `NavError` where a lookup or configuration failure crosses crates.

use thiserror::Error;

use crate::{AgentId, MapId};

/// The top-level error type for `gn-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("map {0} not found")]
    MapNotFound(MapId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `gn-*` crates.
pub type NavResult<T> = Result<T, NavError>;
