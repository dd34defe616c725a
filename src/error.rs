use thiserror::Error;

use crate::types::ProcessId;

/// Errors that can occur while building or running a simulation.
#[derive(Error, Debug)]
pub enum MisError {
    /// The adjacency input does not describe a simple undirected graph.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// Simulation parameters are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Graph input text could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Graph input could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Two adjacent processes both ended up in the independent set.
    #[error("independent set violated: processes {a} and {b} are adjacent")]
    NotIndependent { a: ProcessId, b: ProcessId },

    /// A process was still a candidate after the round limit.
    #[error("process {process} still a candidate after {limit} rounds")]
    RoundLimit { process: ProcessId, limit: usize },

    /// The round barrier was torn down while a party was waiting.
    #[error("round barrier closed while waiting")]
    BarrierClosed,

    /// The coordinator has already run its processes.
    #[error("simulation already ran")]
    AlreadyRun,

    /// Task execution failed.
    #[error("task execution failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
