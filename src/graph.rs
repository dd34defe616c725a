use crate::{error::MisError, types::ProcessId};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Fixed undirected adjacency over process identifiers.
///
/// Built once before any process starts and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    /// Process ids in input order.
    ids: Vec<ProcessId>,

    /// Neighbour lists, ordered as they appear in the adjacency row.
    adjacency: HashMap<ProcessId, Vec<ProcessId>>,
}

impl Graph {
    /// Builds a graph from `n` distinct ids and an `n x n` adjacency matrix.
    ///
    /// # Errors
    /// Returns `MisError::InvalidGraph` if ids repeat, the matrix is not square over the ids,
    /// contains a self loop, or is not symmetric.
    pub fn from_adjacency_matrix(ids: Vec<ProcessId>, matrix: &[Vec<bool>]) -> Result<Self, MisError> {
        let n = ids.len();
        check_distinct(&ids)?;
        if matrix.len() != n {
            return Err(MisError::InvalidGraph(format!(
                "expected {n} adjacency rows, found {}",
                matrix.len()
            )));
        }

        if let Some((i, row)) = matrix.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(MisError::InvalidGraph(format!(
                "row {i} has {} entries, expected {n}",
                row.len()
            )));
        }

        let mut adjacency = HashMap::with_capacity(n);
        for (i, row) in matrix.iter().enumerate() {
            if row[i] {
                return Err(MisError::InvalidGraph(format!("self loop on process {}", ids[i])));
            }
            let mut neighbors = Vec::new();
            for (j, &linked) in row.iter().enumerate() {
                if linked != matrix[j][i] {
                    return Err(MisError::InvalidGraph(format!(
                        "adjacency between {} and {} is not symmetric",
                        ids[i], ids[j]
                    )));
                }
                if linked {
                    neighbors.push(ids[j]);
                }
            }
            adjacency.insert(ids[i], neighbors);
        }

        Ok(Self { ids, adjacency })
    }

    /// Builds a graph from ids and an undirected edge list.
    ///
    /// # Errors
    /// Same conditions as [`Graph::from_adjacency_matrix`], plus edges naming unknown ids.
    pub fn from_edges(ids: Vec<ProcessId>, edges: &[(ProcessId, ProcessId)]) -> Result<Self, MisError> {
        check_distinct(&ids)?;
        let index: HashMap<ProcessId, usize> = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let mut matrix = vec![vec![false; ids.len()]; ids.len()];
        for &(a, b) in edges {
            let (Some(&i), Some(&j)) = (index.get(&a), index.get(&b)) else {
                return Err(MisError::InvalidGraph(format!("edge ({a}, {b}) names an unknown process")));
            };
            matrix[i][j] = true;
            matrix[j][i] = true;
        }
        Self::from_adjacency_matrix(ids, &matrix)
    }

    /// Process ids in input order.
    pub fn ids(&self) -> &[ProcessId] {
        &self.ids
    }

    /// Neighbours of `id`, empty for unknown ids.
    pub fn neighbors(&self, id: ProcessId) -> &[ProcessId] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every undirected edge exactly once, lower input position first.
    pub fn edges(&self) -> Vec<(ProcessId, ProcessId)> {
        let position: HashMap<ProcessId, usize> =
            self.ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let mut edges = Vec::new();
        for (i, &id) in self.ids.iter().enumerate() {
            for neighbor in self.neighbors(id) {
                if position[neighbor] > i {
                    edges.push((id, *neighbor));
                }
            }
        }
        edges
    }

    pub fn contains(&self, id: ProcessId) -> bool {
        self.adjacency.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn check_distinct(ids: &[ProcessId]) -> Result<(), MisError> {
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(*id) {
            return Err(MisError::InvalidGraph(format!("duplicate process id {id}")));
        }
    }
    Ok(())
}

/// Parses the text input format: a count `n`, then `n` process ids, then `n * n`
/// adjacency entries (`0` or `1`), all separated by whitespace.
///
/// # Errors
/// Returns `MisError::Parse` for missing or malformed tokens and `MisError::InvalidGraph`
/// when the parsed matrix is not a simple undirected graph.
pub fn parse_graph(input: &str) -> Result<Graph, MisError> {
    let mut tokens = input.split_whitespace();
    let mut next = |what: &str| -> Result<u64, MisError> {
        let token = tokens
            .next()
            .ok_or_else(|| MisError::Parse(format!("unexpected end of input, expected {what}")))?;
        token
            .parse::<u64>()
            .map_err(|_| MisError::Parse(format!("invalid {what}: {token:?}")))
    };

    let n = usize::try_from(next("process count")?)
        .map_err(|_| MisError::Parse("process count out of range".into()))?;
    let mut ids = Vec::new();
    for _ in 0..n {
        ids.push(ProcessId(next("process id")?));
    }

    let mut matrix = Vec::with_capacity(ids.len());
    for _ in 0..n {
        let mut row = Vec::with_capacity(ids.len());
        for _ in 0..n {
            match next("adjacency entry")? {
                0 => row.push(false),
                1 => row.push(true),
                other => {
                    return Err(MisError::Parse(format!("adjacency entry must be 0 or 1, found {other}")))
                }
            }
        }
        matrix.push(row);
    }

    Graph::from_adjacency_matrix(ids, &matrix)
}

/// Reads and parses a graph file in the format accepted by [`parse_graph`].
pub fn load_graph(path: impl AsRef<Path>) -> Result<Graph, MisError> {
    let input = std::fs::read_to_string(path)?;
    parse_graph(&input)
}
