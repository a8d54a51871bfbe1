//! Samples a connected graph and K1-colors it, printing one JSON object
//! per stage.

use std::io;
use std::time::Instant;

use serde_json::json;
use structopt::StructOpt;

use k1color::conflict::ConflictDetector;
use k1color::progress::JsonProgress;
use k1color::stats::{ColorClasses, SummaryStats};
use k1color::{generate, K1Coloring, K1ColoringConfig};

/// Colors a random connected graph with the parallel K1 heuristic.
#[derive(Debug, StructOpt)]
#[structopt(name = "color", about = "K1-color a sampled graph.")]
struct Opt {
    /// Number of vertices.
    #[structopt(long)]
    nvertices: usize,

    /// Extra edges per vertex on top of the spanning path.
    #[structopt(long, default_value = "4")]
    degree: usize,

    /// Random sampling seed
    #[structopt(long, default_value = "0")]
    seed: u64,

    /// Worker threads; defaults to the number of cores.
    #[structopt(long)]
    concurrency: Option<usize>,

    /// Active nodes per batch.
    #[structopt(long, default_value = "10000")]
    batch_size: usize,

    /// Coloring rounds before giving up.
    #[structopt(long, default_value = "10")]
    max_iterations: u32,

    /// Only report colors held by at least this many nodes.
    #[structopt(long, default_value = "1")]
    min_color_size: usize,
}

fn main() -> k1color::Result<()> {
    let opt = Opt::from_args();

    let sample_start = Instant::now();
    let graph = generate::connected(opt.nvertices, opt.degree, opt.seed)?;
    println!(
        "{}",
        json!({
            "nvertices": graph.nvertices(),
            "nedges": graph.nrelationships() / 2,
            "max_degree": graph.max_degree(),
            "sample_duration": format!("{:.0?}", sample_start.elapsed()),
        })
    );

    let mut config = K1ColoringConfig::default()
        .with_batch_size(opt.batch_size)
        .with_max_iterations(opt.max_iterations);
    if let Some(concurrency) = opt.concurrency {
        config = config.with_concurrency(concurrency);
    }

    let colors_start = Instant::now();
    let result = K1Coloring::new(graph.clone(), config)?
        .with_progress(JsonProgress::new(io::stdout()))
        .compute()?;
    let colors_duration = colors_start.elapsed();

    let classes = ColorClasses::new(result.colors(), result.used_colors());
    let cardinalities = SummaryStats::from(classes.sizes().map(|s| s as f64)).map(|s| s.to_map());
    let reported = result
        .colors_with_min_size(opt.min_color_size)
        .iter()
        .filter(|c| c.is_some())
        .count();
    println!(
        "{}",
        json!({
            "concurrency": config.concurrency,
            "ran_iterations": result.ran_iterations(),
            "did_converge": result.did_converge(),
            "color_count": result.color_count(),
            "color_cardinalities": cardinalities,
            "reported_nodes": reported,
            "colors_duration": format!("{:.0?}", colors_duration),
        })
    );

    let conflicts = ConflictDetector::count_conflicts(&graph, result.colors());
    println!("{}", json!({ "conflicts": conflicts }));
    assert!(!result.did_converge() || conflicts == 0);
    Ok(())
}
