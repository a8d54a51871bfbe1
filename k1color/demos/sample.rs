//! Samples a low-degree connected simple graph and reports its shape.

use std::time::Instant;

use itertools::{Itertools, MinMaxResult};
use serde_json::json;
use structopt::StructOpt;

use k1color::stats::SummaryStats;
use k1color::{generate, Graph, NodeId};

/// Generate a connected simple graph with the provided average degree.
#[derive(Debug, StructOpt)]
#[structopt(name = "sample", about = "Sample a connected graph.")]
struct Opt {
    /// Average degree less two (the true average degree is actually larger
    /// than this by about two, because we'd like to ensure the graph is
    /// connected). If this is set too large to be feasible, then graph will
    /// just end up being complete.
    #[structopt(long)]
    degree: usize,

    /// Number of vertices.
    #[structopt(long)]
    nvertices: usize,

    /// Random sampling seed
    #[structopt(long)]
    seed: u64,
}

fn main() -> k1color::Result<()> {
    let opt = Opt::from_args();

    let sample_start = Instant::now();
    let graph = generate::connected(opt.nvertices, opt.degree, opt.seed)?;
    let sample_duration = format!("{:.0?}", sample_start.elapsed());

    let degrees = (0..graph.nvertices()).map(|v| graph.degree(v as NodeId));
    let (min_degree, max_degree) = match degrees.clone().minmax() {
        MinMaxResult::NoElements => (0, 0),
        MinMaxResult::OneElement(d) => (d, d),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };
    let degree_stats = SummaryStats::from(degrees.map(f64::from)).map(|s| s.to_map());

    println!(
        "{}",
        json!({
            "nvertices": graph.nvertices(),
            "nedges": graph.nrelationships() / 2,
            "min_degree": min_degree,
            "max_degree": max_degree,
            "degrees": degree_stats,
            "sample_duration": sample_duration,
        })
    );
    Ok(())
}
