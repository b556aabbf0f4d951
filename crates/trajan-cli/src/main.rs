// crates/trajan-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trajan_core::config::{FilamentParams, SimParams, TrapParams, XlinkParams};
use trajan_scan::{analyze_seed_dir, run_param_scan, run_seed_scan, Policy};
use trajan_trace::{generate_seed_files, SynthSpec};

#[derive(Parser, Debug)]
#[command(
    name = "trajan-cli",
    about = "trajan reference CLI",
    long_about = "trajan reference CLI.\n\nUse this tool to generate synthetic trajectory data, analyze single seeds, and fold seed/parameter scans into mean/std statistics.",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Generate synthetic seed directories (binary streams + parameters)
    Simulate {
        /// Output parameter directory; seeds land in s0/, s1/, …
        #[arg(long, default_value = "simulations/k2.0")]
        out_dir: PathBuf,

        /// Number of sibling seeds to generate
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
        seeds: u32,

        /// Total simulation steps per seed
        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(i32).range(1..))]
        n_steps: i32,

        /// Record stride (one frame every n steps)
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(i32).range(1..))]
        n_posit: i32,

        /// Simulation time step
        #[arg(long, default_value_t = 0.01)]
        delta: f64,

        /// Crosslinker records per frame
        #[arg(long, default_value_t = 8)]
        n_xlinks: usize,

        /// Truncate the optical-trap stream after this many frames
        #[arg(long)]
        trap_frames: Option<usize>,
    },

    /// Decode and analyze one seed directory
    Analyze {
        /// Seed directory holding *_params.json and the binary streams
        input: PathBuf,

        /// Reuse, recompute, or require existing derived results
        #[arg(long, value_enum, default_value_t = PolicyOpt::Analyze)]
        policy: PolicyOpt,
    },

    /// Aggregate every seed under one parameter directory
    SeedScan {
        /// Parameter directory holding seed subdirectories
        input: PathBuf,

        /// Reuse, recompute, or require existing derived results
        #[arg(long, value_enum, default_value_t = PolicyOpt::Analyze)]
        policy: PolicyOpt,
    },

    /// Run seed scans over every parameter directory under a root
    ParamScan {
        /// Simulations root (one subdirectory per swept parameter value)
        input: PathBuf,

        /// Reuse, recompute, or require existing derived results
        #[arg(long, value_enum, default_value_t = PolicyOpt::Analyze)]
        policy: PolicyOpt,
    },
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum PolicyOpt {
    /// Only load existing derived results
    Load,
    /// Reuse existing results, compute missing ones
    Analyze,
    /// Delete and recompute all derived results
    Overwrite,
}

impl From<PolicyOpt> for Policy {
    fn from(p: PolicyOpt) -> Self {
        match p {
            PolicyOpt::Load => Self::Load,
            PolicyOpt::Analyze => Self::Analyze,
            PolicyOpt::Overwrite => Self::Overwrite,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Simulate {
            out_dir,
            seeds,
            n_steps,
            n_posit,
            delta,
            n_xlinks,
            trap_frames,
        } => simulate(out_dir, seeds, n_steps, n_posit, delta, n_xlinks, trap_frames),

        Cmd::Analyze { input, policy } => analyze(input, policy.into()),

        Cmd::SeedScan { input, policy } => seed_scan(input, policy.into()),

        Cmd::ParamScan { input, policy } => param_scan(input, policy.into()),
    }
}

/// Initialize tracing with an env-driven filter (default INFO).
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_level(true).compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn synthetic_params(seed: u64) -> SimParams {
    SimParams {
        run_name: "synthetic".into(),
        seed,
        anchor_id_offset: 1,
        rigid_filament: vec![FilamentParams {
            name: "fil".into(),
            length: 10.0,
            diameter: Some(1.0),
            stationary_flag: Some(true),
        }],
        crosslink: vec![XlinkParams {
            name: "xl".into(),
            concentration: Some(0.1),
            k_spring: 2.0,
            n_spec: Some(100),
        }],
        optical_trap: vec![TrapParams { name: "trap".into(), k_spring: 1.0 }],
    }
}

#[allow(clippy::too_many_arguments)]
fn simulate(
    out_dir: PathBuf,
    seeds: u32,
    n_steps: i32,
    n_posit: i32,
    delta: f64,
    n_xlinks: usize,
    trap_frames: Option<usize>,
) -> Result<()> {
    if n_posit > n_steps {
        bail!("record stride ({n_posit}) cannot exceed total steps ({n_steps})");
    }

    let spec = SynthSpec { n_steps, n_posit, delta, n_xlinks, trap_frames };
    info!(out = %out_dir.display(), seeds, n_steps, n_posit, "generating synthetic seeds");

    for seed in 0..u64::from(seeds) {
        let dir = out_dir.join(format!("s{seed}"));
        generate_seed_files(&dir, &synthetic_params(seed), &spec)
            .with_context(|| format!("generating seed {seed}"))?;
    }

    println!(
        "Simulated {seeds} seeds: T={n_steps}, stride={n_posit} → {} frames each → {}",
        n_steps / n_posit,
        out_dir.display()
    );
    Ok(())
}

fn analyze(input: PathBuf, policy: Policy) -> Result<()> {
    info!(input = %input.display(), ?policy, "analyzing seed");
    let res = analyze_seed_dir(&input, policy)
        .with_context(|| format!("analyzing seed in {}", input.display()))?;

    println!(
        "Analyzed seed {} ({} frames) → {}",
        res.seed,
        res.frame_count(),
        input.join(res.params.result_file()).display()
    );
    Ok(())
}

fn seed_scan(input: PathBuf, policy: Policy) -> Result<()> {
    info!(input = %input.display(), ?policy, "running seed scan");
    let scan = run_seed_scan(&input, policy)
        .with_context(|| format!("seed scan over {}", input.display()))?;

    println!(
        "Aggregated {} seeds over {} frames → {}",
        scan.n_seeds,
        scan.time.len(),
        input.display()
    );
    Ok(())
}

fn param_scan(input: PathBuf, policy: Policy) -> Result<()> {
    info!(input = %input.display(), ?policy, "running parameter scan");
    let report = run_param_scan(&input, policy)
        .with_context(|| format!("parameter scan over {}", input.display()))?;

    println!("Parameter scan: {} completed, {} failed", report.completed.len(), report.failed.len());
    for (dir, err) in &report.failed {
        eprintln!("  FAILED {}: {err}", dir.display());
    }
    if !report.all_ok() {
        bail!("{} parameter director(ies) failed", report.failed.len());
    }
    Ok(())
}
