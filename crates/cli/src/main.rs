//! Cache coherence simulator CLI.
//!
//! This binary drives a configured cache system from the command line. It performs:
//! 1. **Run:** Replay a memory-reference trace and print per-operation outcomes and statistics.
//! 2. **Check:** Validate a configuration and print the geometry of every cache.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (e.g. `RUST_LOG=cohesim_core=debug`).
//!
//! The exit code is 1 for configuration, trace-file and parse errors. Requests
//! rejected during replay (misaligned, unknown cache, ...) are reported as
//! outcomes and do not fail the run.

use std::path::{Path, PathBuf};
use std::{fs, process};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cohesim_core::config::SystemConfig;
use cohesim_core::sim::{TraceOutcome, parse_trace, replay};
use cohesim_core::stats::SystemStats;
use cohesim_core::{BackingStore, CacheSystem};

#[derive(Parser, Debug)]
#[command(
    name = "cohesim",
    author,
    version,
    about = "Bit-packed cache and MESI coherence simulator",
    long_about = "Replay memory-reference traces against a system of coherent caches.\n\nExamples:\n  cohesim check --config system.json\n  cohesim run --config system.json --trace refs.trace --dump\n  cohesim run --config system.json --trace refs.trace --json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace against the configured system.
    Run {
        /// JSON system configuration.
        #[arg(short, long)]
        config: PathBuf,

        /// Trace file (`r <id> <addr> <width>` / `w <id> <addr> <width> <value>`).
        #[arg(short, long)]
        trace: PathBuf,

        /// Print every cache's contents after the run.
        #[arg(long)]
        dump: bool,

        /// Emit outcomes and statistics as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Validate a configuration and print its caches.
    Check {
        /// JSON system configuration.
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Serialize)]
struct Report<'a> {
    outcomes: &'a [TraceOutcome],
    stats: &'a SystemStats,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            config,
            trace,
            dump,
            json,
        } => cmd_run(&config, &trace, dump, json),
        Commands::Check { config } => cmd_check(&config),
    };
    if let Err(msg) = result {
        eprintln!("Error: {msg}");
        process::exit(1);
    }
}

fn load_system(config: &Path) -> Result<CacheSystem, String> {
    let config = SystemConfig::from_file(config).map_err(|e| e.to_string())?;
    CacheSystem::from_config(&config).map_err(|e| e.to_string())
}

fn cmd_run(config: &Path, trace: &Path, dump: bool, json: bool) -> Result<(), String> {
    let mut system = load_system(config)?;
    let text = fs::read_to_string(trace)
        .map_err(|e| format!("could not read trace {}: {e}", trace.display()))?;
    let ops = parse_trace(&text).map_err(|e| e.to_string())?;
    info!(ops = ops.len(), "replaying trace");

    let outcomes = replay(&mut system, &ops);
    let stats = system.stats();

    if json {
        let report = Report {
            outcomes: &outcomes,
            stats: &stats,
        };
        let out = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{out}");
    } else {
        for outcome in &outcomes {
            println!("{outcome}");
        }
        println!();
        stats.print();
    }

    if dump {
        for id in system.cache_ids() {
            if let Some(cache) = system.cache(id) {
                println!("{id}:");
                print!("{cache}");
            }
        }
    }

    let rejected = outcomes.iter().filter(|o| !o.is_ok()).count();
    if rejected > 0 {
        eprintln!("note: {rejected} of {} operations were rejected", outcomes.len());
    }
    Ok(())
}

fn cmd_check(config: &Path) -> Result<(), String> {
    let system = load_system(config)?;
    println!(
        "block size {} bytes, memory {} bytes",
        system.block_bytes(),
        system.memory().len()
    );
    for id in system.cache_ids() {
        if let Some(cache) = system.cache(id) {
            let g = cache.geometry();
            println!(
                "  {id}: {} ways, {} bytes, {} sets, tag/index/offset = {}/{}/{} bits",
                g.ways,
                g.total_bytes,
                g.num_sets(),
                g.tag_bits(),
                g.index_bits(),
                g.offset_bits()
            );
        }
    }
    Ok(())
}
