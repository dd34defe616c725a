use crate::{error::MisError, types::ProcessId};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// When a process draws its random id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdPolicy {
    /// Draw a fresh id before every round the process is still a candidate.
    #[default]
    Redraw,

    /// Keep the id drawn at spawn for the whole run.
    DrawOnce,
}

/// Parameters of a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seed for reproducible id draws; `None` uses OS entropy.
    pub seed: Option<u64>,

    pub id_policy: IdPolicy,

    /// Rounds after which a remaining candidate aborts the run. Defaults to `4n + 64`.
    pub max_rounds: Option<usize>,

    /// Ids pinned for specific processes. Pinned ids are never redrawn.
    pub fixed_ids: HashMap<ProcessId, u64>,
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_id_policy(mut self, id_policy: IdPolicy) -> Self {
        self.id_policy = id_policy;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    /// Pins the random id of `process`.
    pub fn with_fixed_id(mut self, process: ProcessId, random_id: u64) -> Self {
        self.fixed_ids.insert(process, random_id);
        self
    }

    /// Checks the parameters before a run.
    ///
    /// # Errors
    /// Returns an error if `max_rounds` is zero.
    pub fn validate(&self) -> Result<(), MisError> {
        if self.max_rounds == Some(0) {
            return Err(MisError::InvalidConfig("max_rounds must be positive".into()));
        }
        Ok(())
    }

    /// Round limit for a graph of `num_nodes` processes.
    pub fn round_limit(&self, num_nodes: usize) -> usize {
        self.max_rounds
            .unwrap_or_else(|| num_nodes.saturating_mul(4).saturating_add(64))
    }

    /// Builds the id source for one process.
    pub(crate) fn id_source(&self, process: ProcessId, num_nodes: usize) -> IdSource {
        if let Some(&fixed) = self.fixed_ids.get(&process) {
            return IdSource::Fixed(fixed);
        }
        let rng = match self.seed {
            // Mix the process id in so neighbours sharing a seed draw different streams.
            Some(seed) => StdRng::seed_from_u64(seed ^ process.0.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            None => StdRng::from_entropy(),
        };
        IdSource::Random {
            rng,
            bound: id_bound(num_nodes),
            redraw: self.id_policy == IdPolicy::Redraw,
        }
    }
}

/// Exclusive upper bound of random ids, `n^4` saturated to `u64::MAX`.
pub fn id_bound(num_nodes: usize) -> u64 {
    (num_nodes as u64)
        .checked_pow(4)
        .unwrap_or(u64::MAX)
        .max(1)
}

/// Where a process takes its random ids from.
#[derive(Debug)]
pub(crate) enum IdSource {
    Fixed(u64),
    Random { rng: StdRng, bound: u64, redraw: bool },
}

impl IdSource {
    /// Id for the first round.
    pub(crate) fn initial(&mut self) -> u64 {
        match self {
            IdSource::Fixed(id) => *id,
            IdSource::Random { rng, bound, .. } => rng.gen_range(0..*bound),
        }
    }

    /// Id for a following round, or `None` to keep the current one.
    pub(crate) fn next_round(&mut self) -> Option<u64> {
        match self {
            IdSource::Random { rng, bound, redraw: true } => Some(rng.gen_range(0..*bound)),
            _ => None,
        }
    }
}
