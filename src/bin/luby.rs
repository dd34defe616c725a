//! Reads a graph file, computes its MIS with simulated processes, and prints the result.
//!
//! Usage: `luby <input-file> [seed]`

use anyhow::{bail, Context, Result};
use luby_mis::{load_graph, Coordinator, SimulationConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("input file not provided; usage: luby <input-file> [seed]");
    };

    let mut config = SimulationConfig::new();
    if let Some(seed) = args.next() {
        let seed = seed.parse::<u64>().with_context(|| format!("invalid seed {seed:?}"))?;
        config = config.with_seed(seed);
    }

    let graph = load_graph(&path).with_context(|| format!("failed to load graph from {path}"))?;
    let mut coordinator = Coordinator::build(graph, config)?;
    let report = coordinator.simulate().await.context("MIS computation failed")?;

    println!("{report}");
    if !report.maximal {
        println!("Warning: the independent set is not maximal");
    }
    Ok(())
}
