use crate::types::{NodeSnapshot, ProcessId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Shared state visible to every process actor.
///
/// Each process writes its own `random_id` and `is_independent`. The only cross-process write
/// is [`StateStore::exclude`], which may only ever clear a neighbour's candidacy.
pub trait StateStore: Send + Sync + 'static {
    /// Creates one candidate entry per id. The key set is fixed afterwards.
    fn with_nodes(ids: &[ProcessId]) -> Self
    where
        Self: Sized;

    /// Copies the state of `id`, or `None` if the id is unknown.
    fn snapshot(&self, id: ProcessId) -> Option<NodeSnapshot>;

    fn random_id(&self, id: ProcessId) -> Option<u64>;

    fn is_candidate(&self, id: ProcessId) -> bool;

    fn is_independent(&self, id: ProcessId) -> bool;

    /// Publishes the random id `owner` compares with in the next round.
    fn publish_random_id(&self, owner: ProcessId, value: u64);

    /// Puts `owner` in the independent set and ends its candidacy.
    fn join_independent_set(&self, owner: ProcessId);

    /// Ends the candidacy of `target`, a neighbour of `by` that joined the set.
    fn exclude(&self, by: ProcessId, target: ProcessId);
}

#[derive(Debug)]
struct NodeCell {
    random_id: AtomicU64,
    candidate: AtomicBool,
    independent: AtomicBool,
}

impl NodeCell {
    fn new() -> Self {
        Self {
            random_id: AtomicU64::new(0),
            candidate: AtomicBool::new(true),
            independent: AtomicBool::new(false),
        }
    }
}

/// Lock-free [`StateStore`] with one atomic cell per process.
#[derive(Debug)]
pub struct NodeStateStore {
    cells: HashMap<ProcessId, NodeCell>,
}

impl NodeStateStore {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl StateStore for NodeStateStore {
    fn with_nodes(ids: &[ProcessId]) -> Self {
        let cells = ids.iter().map(|&id| (id, NodeCell::new())).collect();
        Self { cells }
    }

    fn snapshot(&self, id: ProcessId) -> Option<NodeSnapshot> {
        self.cells.get(&id).map(|cell| NodeSnapshot {
            random_id: cell.random_id.load(Ordering::Acquire),
            is_candidate: cell.candidate.load(Ordering::Acquire),
            is_independent: cell.independent.load(Ordering::Acquire),
        })
    }

    fn random_id(&self, id: ProcessId) -> Option<u64> {
        self.cells.get(&id).map(|cell| cell.random_id.load(Ordering::Acquire))
    }

    fn is_candidate(&self, id: ProcessId) -> bool {
        self.cells
            .get(&id)
            .is_some_and(|cell| cell.candidate.load(Ordering::Acquire))
    }

    fn is_independent(&self, id: ProcessId) -> bool {
        self.cells
            .get(&id)
            .is_some_and(|cell| cell.independent.load(Ordering::Acquire))
    }

    fn publish_random_id(&self, owner: ProcessId, value: u64) {
        if let Some(cell) = self.cells.get(&owner) {
            cell.random_id.store(value, Ordering::Release);
        }
    }

    fn join_independent_set(&self, owner: ProcessId) {
        if let Some(cell) = self.cells.get(&owner) {
            cell.independent.store(true, Ordering::Release);
            cell.candidate.store(false, Ordering::Release);
        }
    }

    fn exclude(&self, _by: ProcessId, target: ProcessId) {
        if let Some(cell) = self.cells.get(&target) {
            cell.candidate.store(false, Ordering::Release);
        }
    }
}
