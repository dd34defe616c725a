use crate::{
    barrier::RoundGate, config::IdSource, error::MisError, store::StateStore, types::ProcessId,
};
use std::sync::Arc;
use tokio::sync::Barrier;
use tracing::{debug, trace};

tokio::task_local! {
    static CURRENT_PROCESS: ProcessId;
}

/// Id of the process actor running on the current task, if any.
///
/// Lets a [`StateStore`] attribute writes to the actor performing them.
pub fn current_process() -> Option<ProcessId> {
    CURRENT_PROCESS.try_with(|id| *id).ok()
}

/// One simulated process running Luby's decision loop against the shared store.
pub(crate) struct ProcessActor<S: StateStore> {
    /// Process identifier.
    id: ProcessId,

    /// Neighbouring processes, the only state this actor may read besides its own.
    neighbors: Vec<ProcessId>,

    /// Shared state of every process.
    store: Arc<S>,

    /// Released once every actor has published its first id.
    start: Arc<Barrier>,

    /// Per-round synchronization between the remaining candidates.
    gate: Arc<RoundGate>,

    ids: IdSource,

    max_rounds: usize,
}

impl<S: StateStore> ProcessActor<S> {
    pub(crate) fn new(
        id: ProcessId,
        neighbors: Vec<ProcessId>,
        store: Arc<S>,
        start: Arc<Barrier>,
        gate: Arc<RoundGate>,
        ids: IdSource,
        max_rounds: usize,
    ) -> Self {
        Self {
            id,
            neighbors,
            store,
            start,
            gate,
            ids,
            max_rounds,
        }
    }

    /// Runs the actor to termination and returns the number of rounds it executed.
    pub(crate) async fn run(self) -> Result<usize, MisError> {
        let id = self.id;
        CURRENT_PROCESS.scope(id, self.run_rounds()).await
    }

    async fn run_rounds(mut self) -> Result<usize, MisError> {
        let random_id = self.ids.initial();
        self.store.publish_random_id(self.id, random_id);
        debug!(process = %self.id, random_id, "drew random id");

        self.start.wait().await;

        let mut round_count = 0;
        while self.store.is_candidate(self.id) {
            if round_count >= self.max_rounds {
                self.gate.leave();
                return Err(MisError::RoundLimit {
                    process: self.id,
                    limit: self.max_rounds,
                });
            }

            let is_max = self.is_local_max();

            // Decisions are computed; nobody writes before everybody has read.
            if let Err(err) = self.gate.arrive_and_wait().await {
                self.gate.leave();
                return Err(err);
            }

            if is_max {
                self.store.join_independent_set(self.id);
                for &neighbor in &self.neighbors {
                    self.store.exclude(self.id, neighbor);
                }
                debug!(process = %self.id, round = round_count + 1, "joined independent set");
            } else if let Some(next_id) = self.ids.next_round() {
                self.store.publish_random_id(self.id, next_id);
            }

            // Writes are applied; the next round reads a settled view.
            if let Err(err) = self.gate.arrive_and_wait().await {
                self.gate.leave();
                return Err(err);
            }
            round_count += 1;
            trace!(process = %self.id, round = round_count, is_max, "round complete");
        }

        self.gate.leave();
        debug!(
            process = %self.id,
            rounds = round_count,
            independent = self.store.is_independent(self.id),
            "process terminated"
        );
        Ok(round_count)
    }

    /// True unless a neighbour that is still a candidate holds an id greater than or
    /// equal to ours. Equal ids go to the neighbour, so adjacent ties never both win.
    fn is_local_max(&self) -> bool {
        let Some(own) = self.store.random_id(self.id) else {
            return false;
        };
        !self.neighbors.iter().any(|&neighbor| {
            self.store.is_candidate(neighbor)
                && self.store.random_id(neighbor).is_some_and(|theirs| theirs >= own)
        })
    }
}
