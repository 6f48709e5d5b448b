use thiserror::Error;

use gn_core::{AgentId, MapId, Point};
use gn_grid::GridError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AgentError {
    #[error("footprint size must be at least 1, got {0}")]
    InvalidFootprint(i32),

    #[error("speed must be finite and >= 0, got {0}")]
    InvalidSpeed(f32),

    #[error("arrival tolerance must be finite and >= 0, got {0}")]
    InvalidTolerance(f32),

    #[error("position {0} is not finite")]
    InvalidPosition(Point),

    #[error("agent {agent} is bound to map {bound}, not {given}")]
    WrongMap { agent: AgentId, bound: MapId, given: MapId },

    #[error("grid error: {0}")]
    Grid(#[from] GridError),
}

pub type AgentResult<T> = Result<T, AgentError>;
