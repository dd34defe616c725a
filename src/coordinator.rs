use crate::{
    actor::ProcessActor,
    barrier::RoundGate,
    config::SimulationConfig,
    error::MisError,
    graph::Graph,
    store::{NodeStateStore, StateStore},
    types::{MisReport, NodeSnapshot, ProcessId},
    verify::{is_maximal, verify},
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::Barrier;
use tracing::{info, warn};

/// Owns the simulated network: the graph, the shared state store, and the process actors.
pub struct Coordinator<S: StateStore = NodeStateStore> {
    /// Immutable adjacency of the run.
    graph: Graph,

    /// Shared state of every process.
    store: Arc<S>,

    config: SimulationConfig,

    /// Rounds executed, set once the actors have finished.
    rounds: Option<usize>,
}

impl Coordinator<NodeStateStore> {
    /// Creates a coordinator backed by the lock-free [`NodeStateStore`].
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn build(graph: Graph, config: SimulationConfig) -> Result<Self, MisError> {
        Self::with_store(graph, config)
    }
}

impl<S: StateStore> Coordinator<S> {
    /// Creates a coordinator over any [`StateStore`], materializing an entry for every
    /// process before any actor exists.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn with_store(graph: Graph, config: SimulationConfig) -> Result<Self, MisError> {
        config.validate()?;
        let store = Arc::new(S::with_nodes(graph.ids()));
        info!(processes = graph.len(), edges = graph.edges().len(), "built shared state store");
        Ok(Self {
            graph,
            store,
            config,
            rounds: None,
        })
    }

    /// Spawns one actor per process, releases them together, and waits for all of them.
    ///
    /// Returns the number of rounds executed, the maximum across processes. Every task is
    /// joined before the first actor error is returned.
    pub async fn run(&mut self) -> Result<usize, MisError> {
        if self.rounds.is_some() {
            return Err(MisError::AlreadyRun);
        }

        let n = self.graph.len();
        let max_rounds = self.config.round_limit(n);
        let start = Arc::new(Barrier::new(n + 1));
        let gate = Arc::new(RoundGate::new(n));

        let mut handles = Vec::with_capacity(n);
        for &id in self.graph.ids() {
            let actor = ProcessActor::new(
                id,
                self.graph.neighbors(id).to_vec(),
                Arc::clone(&self.store),
                Arc::clone(&start),
                Arc::clone(&gate),
                self.config.id_source(id, n),
                max_rounds,
            );
            handles.push(tokio::spawn(actor.run()));
        }

        start.wait().await;
        info!(processes = n, "all processes started, computing MIS");

        let mut rounds = 0;
        let mut failure = None;
        for handle in handles {
            match handle.await {
                Ok(Ok(count)) => rounds = rounds.max(count),
                Ok(Err(err)) => {
                    warn!(error = %err, "process failed");
                    failure.get_or_insert(err);
                }
                Err(err) => {
                    failure.get_or_insert(MisError::TaskJoin(err));
                }
            }
        }

        self.rounds = Some(rounds);
        match failure {
            Some(err) => Err(err),
            None => {
                info!(rounds, "all processes terminated");
                Ok(rounds)
            }
        }
    }

    /// Processes whose final state is independent.
    pub fn collect_mis(&self) -> BTreeSet<ProcessId> {
        self.graph
            .ids()
            .iter()
            .copied()
            .filter(|&id| self.store.is_independent(id))
            .collect()
    }

    /// Current state of every process.
    pub fn snapshot(&self) -> BTreeMap<ProcessId, NodeSnapshot> {
        self.graph
            .ids()
            .iter()
            .filter_map(|&id| self.store.snapshot(id).map(|state| (id, state)))
            .collect()
    }

    /// Runs the actors, collects the independent set, and verifies it against the graph.
    ///
    /// # Errors
    /// Returns any error from [`Coordinator::run`], or `MisError::NotIndependent` if two
    /// adjacent processes were both selected.
    pub async fn simulate(&mut self) -> Result<MisReport, MisError> {
        let rounds = self.run().await?;
        let members = self.collect_mis();
        verify(&self.graph, &members)?;
        let maximal = is_maximal(&self.graph, &members);
        if !maximal {
            warn!("independent set is not maximal");
        }
        info!(members = members.len(), rounds, "verified MIS");
        Ok(MisReport {
            members,
            rounds,
            verified: true,
            maximal,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Rounds executed, once [`Coordinator::run`] has completed.
    pub fn rounds(&self) -> Option<usize> {
        self.rounds
    }
}
