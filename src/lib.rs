//! luby-mis: a simulation of a synchronous network of processes that cooperatively compute a
//! Maximal Independent Set with Luby's randomized algorithm.
//!
//! Each process runs as its own task and sees only its neighbours' shared state. There are no
//! explicit messages: a process that joins the set clears its neighbours' candidacy directly
//! in the shared store. Rounds advance in lockstep through a barrier, so every process decides
//! from a settled view of the previous round.
//!
//! # Features
//! - One lightweight tokio task per process.
//! - Lock-free shared state, one atomic cell per process.
//! - Two-phase round barrier: all reads of a round happen before any of its writes.
//! - Reproducible runs through seeded or pinned random ids.
//! - Post-run verification that no two adjacent processes were selected.
//!
//! # Example
//! ```
//! use luby_mis::{Coordinator, Graph, MisError, ProcessId, SimulationConfig};
//!
//! # async fn example() -> Result<(), MisError> {
//! let ids = vec![ProcessId(1), ProcessId(2), ProcessId(3)];
//! let graph = Graph::from_edges(ids, &[(ProcessId(1), ProcessId(2)), (ProcessId(2), ProcessId(3))])?;
//! let mut coordinator = Coordinator::build(graph, SimulationConfig::new().with_seed(7))?;
//! let report = coordinator.simulate().await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

mod actor;
mod barrier;
mod config;
mod coordinator;
mod error;
mod graph;
mod store;
mod types;
mod verify;

pub use actor::current_process;
pub use barrier::RoundGate;
pub use config::{id_bound, IdPolicy, SimulationConfig};
pub use coordinator::Coordinator;
pub use error::MisError;
pub use graph::{load_graph, parse_graph, Graph};
pub use store::{NodeStateStore, StateStore};
pub use types::{MisReport, NodeSnapshot, ProcessId};
pub use verify::{is_maximal, verify};
