//! CLI for rollscope: statistical evaluation of rolling hashes.

mod commands;
mod render;

use clap::Parser;
use rollscope_core::{DEFAULT_PHASE_TIMEOUT_SECS, EvalConfig};

#[derive(Parser)]
#[command(name = "rollscope")]
#[command(about = "rollscope: timing, bit bias, pair correlation and avalanche of rolling hashes")]
#[command(version = rollscope_core::VERSION)]
struct Cli {
    /// Algorithm names to evaluate, in order
    names: Vec<String>,

    /// Evaluate every registered algorithm
    #[arg(long, conflicts_with = "names")]
    all: bool,

    /// With --all, also evaluate algorithms that carry a hazard note
    #[arg(long, requires = "all")]
    include_hazardous: bool,

    /// RNG seed for the sample buffer (defaults to the current Unix time)
    #[arg(long)]
    seed: Option<u64>,

    /// Per-phase timeout in seconds; 0 runs phases without a watchdog
    #[arg(long, default_value_t = DEFAULT_PHASE_TIMEOUT_SECS)]
    timeout_sec: f64,

    /// Write the full run report as JSON
    #[arg(long)]
    output: Option<String>,

    /// List registered algorithms and exit
    #[arg(long)]
    list: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.list {
        commands::list::run();
        return;
    }

    commands::eval::run(commands::eval::EvalCommandConfig {
        names: &cli.names,
        all: cli.all,
        include_hazardous: cli.include_hazardous,
        seed: cli.seed.unwrap_or_else(EvalConfig::clock_seed),
        timeout_sec: cli.timeout_sec,
        output_path: cli.output.as_deref(),
    });
}
