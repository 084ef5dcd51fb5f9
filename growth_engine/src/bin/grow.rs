//! grow — run the growth simulator from a seed and print the resulting plant.

use clap::Parser;
use growth_engine::{GrowthConfig, GrowthEngine, GrowthGraph};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "grow",
    version = env!("CARGO_PKG_VERSION"),
    about = "Grow a plant from a seed and print its organs as JSON"
)]
struct Cli {
    /// TOML file with `seed_size` and a `[rules]` table
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial seed size (overrides the config file)
    #[arg(short, long)]
    seed_size: Option<u32>,

    /// Number of generations to run (the step limit with --until-stable)
    #[arg(short = 'n', long, default_value_t = 1)]
    steps: usize,

    /// Keep stepping until a generation changes nothing
    #[arg(long)]
    until_stable: bool,

    /// Print the full snapshot, edges included, instead of the node listing
    #[arg(long)]
    snapshot: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "growth_engine=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GrowthConfig::load(path)?,
        None => GrowthConfig::default(),
    };
    if let Some(seed_size) = cli.seed_size {
        config.seed_size = seed_size;
    }

    let engine = GrowthEngine::new(config.rules);
    let mut graph = GrowthGraph::with_seed_size(config.seed_size);

    if cli.until_stable {
        if engine.run_until_stable(&mut graph, cli.steps)?.is_none() {
            tracing::warn!(steps = cli.steps, "plant did not stabilize");
        }
    } else {
        engine.run(&mut graph, cli.steps)?;
    }

    let output = if cli.snapshot {
        serde_json::to_string_pretty(&graph.snapshot())?
    } else {
        serde_json::to_string_pretty(&graph.ordered_nodes())?
    };
    println!("{}", output);

    Ok(())
}
