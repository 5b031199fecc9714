use log::debug;
use rollscope_core::{EvalConfig, Evaluator, Registry, Selection};

use crate::render::render_report;

pub struct EvalCommandConfig<'a> {
    pub names: &'a [String],
    pub all: bool,
    pub include_hazardous: bool,
    pub seed: u64,
    pub timeout_sec: f64,
    pub output_path: Option<&'a str>,
}

fn selection(cfg: &EvalCommandConfig<'_>) -> Selection {
    if cfg.all {
        Selection::All {
            include_hazardous: cfg.include_hazardous,
        }
    } else {
        Selection::Named(cfg.names.to_vec())
    }
}

pub fn run(cfg: EvalCommandConfig<'_>) {
    if !cfg.all && cfg.names.is_empty() {
        eprintln!("No algorithms selected. Pass algorithm names, --all, or --list.");
        std::process::exit(1);
    }

    let phase_timeout = match super::parse_timeout(cfg.timeout_sec) {
        Ok(t) => t,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(1);
        }
    };

    let config = EvalConfig {
        phase_timeout,
        ..EvalConfig::new(cfg.seed)
    };

    println!("Using RNG seed {}", cfg.seed);

    let selection = selection(&cfg);
    debug!("selection: {selection:?}, config: {config:?}");

    let evaluator = Evaluator::new(Registry::builtin(), config);
    let report = match evaluator.run(&selection) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    print!("{}", render_report(&report));

    if let Some(path) = cfg.output_path {
        match super::write_json(path, &report) {
            Ok(()) => println!("\nReport written to {path}"),
            Err(e) => {
                eprintln!("\nFailed to write {path}: {e}");
                std::process::exit(1);
            }
        }
    }

    if report.has_failures() {
        std::process::exit(1);
    }
}
