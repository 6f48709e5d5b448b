use thiserror::Error;

use gn_agent::AgentError;
use gn_core::{MapId, NavError};
use gn_grid::GridError;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error(transparent)]
    Nav(#[from] NavError),

    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("map {map} still has {agents} agent(s) bound to it")]
    MapInUse { map: MapId, agents: usize },

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WorldResult<T> = Result<T, WorldError>;
