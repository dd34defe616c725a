use crate::{error::MisError, graph::Graph, types::ProcessId};
use std::collections::BTreeSet;

/// Checks that no edge of `graph` has both endpoints in `mis`.
///
/// # Errors
/// Returns `MisError::NotIndependent` naming the first offending edge.
pub fn verify(graph: &Graph, mis: &BTreeSet<ProcessId>) -> Result<(), MisError> {
    match graph
        .edges()
        .into_iter()
        .find(|(a, b)| mis.contains(a) && mis.contains(b))
    {
        Some((a, b)) => Err(MisError::NotIndependent { a, b }),
        None => Ok(()),
    }
}

/// True if every process outside `mis` has a neighbour inside it.
pub fn is_maximal(graph: &Graph, mis: &BTreeSet<ProcessId>) -> bool {
    graph.ids().iter().all(|id| {
        mis.contains(id) || graph.neighbors(*id).iter().any(|neighbor| mis.contains(neighbor))
    })
}
