//! Write-discipline checks using a store double that records who writes which key.

mod common;

use common::random_graph;
use luby_mis::{
    current_process, Coordinator, NodeSnapshot, NodeStateStore, ProcessId, SimulationConfig,
    StateStore,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteKind {
    RandomId,
    Join,
    Exclude,
}

#[derive(Debug, Clone, Copy)]
struct WriteEvent {
    kind: WriteKind,
    writer: Option<ProcessId>,
    key: ProcessId,
    candidate_before: bool,
    candidate_after: bool,
}

/// Delegates to [`NodeStateStore`] and logs every write with the actor performing it.
struct RecordingStore {
    inner: NodeStateStore,
    events: Mutex<Vec<WriteEvent>>,
}

impl RecordingStore {
    fn record(&self, kind: WriteKind, key: ProcessId, write: impl FnOnce(&NodeStateStore)) {
        let candidate_before = self.inner.is_candidate(key);
        write(&self.inner);
        let candidate_after = self.inner.is_candidate(key);
        self.events.lock().unwrap().push(WriteEvent {
            kind,
            writer: current_process(),
            key,
            candidate_before,
            candidate_after,
        });
    }

    fn events(&self) -> Vec<WriteEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl StateStore for RecordingStore {
    fn with_nodes(ids: &[ProcessId]) -> Self {
        Self {
            inner: NodeStateStore::with_nodes(ids),
            events: Mutex::new(Vec::new()),
        }
    }

    fn snapshot(&self, id: ProcessId) -> Option<NodeSnapshot> {
        self.inner.snapshot(id)
    }

    fn random_id(&self, id: ProcessId) -> Option<u64> {
        self.inner.random_id(id)
    }

    fn is_candidate(&self, id: ProcessId) -> bool {
        self.inner.is_candidate(id)
    }

    fn is_independent(&self, id: ProcessId) -> bool {
        self.inner.is_independent(id)
    }

    fn publish_random_id(&self, owner: ProcessId, value: u64) {
        self.record(WriteKind::RandomId, owner, |inner| inner.publish_random_id(owner, value));
    }

    fn join_independent_set(&self, owner: ProcessId) {
        self.record(WriteKind::Join, owner, |inner| inner.join_independent_set(owner));
    }

    fn exclude(&self, by: ProcessId, target: ProcessId) {
        self.record(WriteKind::Exclude, target, |inner| inner.exclude(by, target));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_single_writer_per_key() {
    for seed in 0..5 {
        let graph = random_graph(30, 0.2, seed);
        let mut coordinator = Coordinator::<RecordingStore>::with_store(
            graph.clone(),
            SimulationConfig::new().with_seed(seed),
        )
        .unwrap();
        let report = coordinator.simulate().await.unwrap();
        let events = coordinator.store().events();

        let mut random_id_writes: HashMap<ProcessId, usize> = HashMap::new();
        let mut joins: HashMap<ProcessId, usize> = HashMap::new();
        for event in &events {
            match event.kind {
                WriteKind::RandomId => {
                    assert_eq!(
                        event.writer,
                        Some(event.key),
                        "random id of {} written by {:?}",
                        event.key,
                        event.writer
                    );
                    *random_id_writes.entry(event.key).or_default() += 1;
                }
                WriteKind::Join => {
                    assert_eq!(event.writer, Some(event.key), "{} joined by another process", event.key);
                    *joins.entry(event.key).or_default() += 1;
                }
                WriteKind::Exclude => {
                    let writer = event.writer.expect("exclusion outside any process");
                    assert!(graph.neighbors(writer).contains(&event.key));
                    assert!(report.members.contains(&writer));
                }
            }
        }

        // Every process publishes its own first id; nobody else writes ids.
        for id in graph.ids() {
            assert!(random_id_writes.get(id).copied().unwrap_or(0) >= 1, "{id} never drew an id");
        }
        assert_eq!(joins.len(), report.members.len());
        assert!(joins.values().all(|&count| count == 1));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_candidacy_never_restored() {
    let graph = random_graph(30, 0.25, 42);
    let mut coordinator =
        Coordinator::<RecordingStore>::with_store(graph, SimulationConfig::new().with_seed(42)).unwrap();
    coordinator.simulate().await.unwrap();

    for event in coordinator.store().events() {
        assert!(
            !(!event.candidate_before && event.candidate_after),
            "candidacy of {} restored by {:?}",
            event.key,
            event.kind
        );
        if matches!(event.kind, WriteKind::Join | WriteKind::Exclude) {
            assert!(!event.candidate_after);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_snapshots_show_monotonic_candidacy() {
    let graph = random_graph(40, 0.2, 7);
    let ids = graph.ids().to_vec();
    let mut coordinator = Coordinator::build(graph, SimulationConfig::new().with_seed(7)).unwrap();
    let store: Arc<NodeStateStore> = Arc::clone(coordinator.store());
    let done = Arc::new(AtomicBool::new(false));

    let watcher = {
        let done = Arc::clone(&done);
        tokio::spawn(async move {
            let mut excluded: HashMap<ProcessId, bool> = HashMap::new();
            let mut samples = 0usize;
            loop {
                let finished = done.load(Ordering::Acquire);
                for &id in &ids {
                    let state = store.snapshot(id).unwrap();
                    if excluded.get(&id).copied().unwrap_or(false) {
                        assert!(!state.is_candidate, "{id} became a candidate again");
                    }
                    if !state.is_candidate {
                        excluded.insert(id, true);
                    }
                }
                samples += 1;
                if finished {
                    break;
                }
                tokio::task::yield_now().await;
            }
            (samples, excluded.len())
        })
    };

    let report = coordinator.simulate().await.unwrap();
    done.store(true, Ordering::Release);
    let (samples, excluded) = watcher.await.unwrap();
    assert!(samples >= 1);
    assert_eq!(excluded, coordinator.graph().len());
    assert!(report.maximal);
}
