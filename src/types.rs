use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifier of a simulated process. Stable for the run and unique per node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProcessId(pub u64);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProcessId {
    fn from(id: u64) -> Self {
        ProcessId(id)
    }
}

/// Point-in-time copy of one process' shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Random id used for the current round's comparison.
    pub random_id: u64,

    /// Whether the process may still join or be excluded from the set.
    pub is_candidate: bool,

    /// Whether the process joined the independent set.
    pub is_independent: bool,
}

/// Outcome of a completed simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MisReport {
    /// Processes in the computed independent set.
    pub members: BTreeSet<ProcessId>,

    /// Rounds executed, maximum across all processes.
    pub rounds: usize,

    /// No edge has both endpoints in `members`.
    pub verified: bool,

    /// Every process outside `members` has a neighbour inside it.
    pub maximal: bool,
}

impl fmt::Display for MisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of rounds: {}", self.rounds)?;
        write!(f, "MIS has the processes with IDs:")?;
        for id in &self.members {
            write!(f, " {id}")?;
        }
        writeln!(f)?;
        if self.verified {
            write!(f, "Verified that the MIS constructed is correct")
        } else {
            write!(f, "The MIS constructed is NOT correct")
        }
    }
}
