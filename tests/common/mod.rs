#![allow(dead_code)]

use luby_mis::{Graph, ProcessId};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub fn pids(raw: &[u64]) -> Vec<ProcessId> {
    raw.iter().copied().map(ProcessId).collect()
}

pub fn graph(ids: &[u64], edges: &[(u64, u64)]) -> Graph {
    let edges: Vec<_> = edges.iter().map(|&(a, b)| (ProcessId(a), ProcessId(b))).collect();
    Graph::from_edges(pids(ids), &edges).unwrap()
}

/// Erdos-Renyi graph over ids `100..100 + n`.
pub fn random_graph(n: u64, edge_probability: f64, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let ids: Vec<u64> = (100..100 + n).collect();
    let mut edges = Vec::new();
    for (i, &a) in ids.iter().enumerate() {
        for &b in &ids[i + 1..] {
            if rng.gen_bool(edge_probability) {
                edges.push((a, b));
            }
        }
    }
    graph(&ids, &edges)
}
