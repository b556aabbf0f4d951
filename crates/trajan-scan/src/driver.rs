//! Scan drivers: per-seed analysis, one-directory seed scans, and the
//! whole-tree parameter-scan batch.
//!
//! Batch semantics follow the propagation policy: a failure inside one
//! unit (a seed, or a whole parameter directory) is recorded and the batch
//! moves on; only the failing unit is lost. Seeds decode and analyze in
//! parallel (they share no mutable state) and results are re-sorted by
//! seed id before aggregation so output stays deterministic.

use crate::aggregate::aggregate;
use crate::collect::{collect_seed_results, subdirs, trailing_number};
use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use trajan_analyze::analyze_seed;
use trajan_core::config::read_params;
use trajan_core::io::{write_scan_result_auto, write_seed_result_auto};
use trajan_core::result::{ScanResult, SeedResult};
use trajan_trace::SeedTrajectory;

/// What to do with derived results that already exist on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Policy {
    /// Only load existing results; never decode or analyze.
    Load,
    /// Reuse existing results, compute the missing ones.
    Analyze,
    /// Delete existing results and recompute from the raw streams.
    Overwrite,
}

/// Locate the parameter file (`*_params.json`) inside a seed directory.
fn find_params_file(dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))?;
    let mut found = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with("_params.json"))
        {
            found.push(path);
        }
    }
    found.sort();
    match found.into_iter().next() {
        Some(p) => Ok(p),
        None => bail!("no *_params.json parameter file in {}", dir.display()),
    }
}

/// Analyze one seed directory according to `policy`, returning its result.
///
/// The result file is `<run>_result.json` next to the raw streams; a prior
/// file is deleted before recomputation so partial old/new mixes cannot
/// happen.
pub fn analyze_seed_dir(dir: &Path, policy: Policy) -> Result<SeedResult> {
    let params = read_params(find_params_file(dir)?)?;
    let result_path = dir.join(params.result_file());

    match policy {
        Policy::Load => {
            if !result_path.exists() {
                bail!("{} does not exist when trying to load", result_path.display());
            }
            trajan_core::io::read_seed_result_auto(&result_path)
        }
        Policy::Analyze if result_path.exists() => {
            trajan_core::io::read_seed_result_auto(&result_path)
        }
        _ => {
            if result_path.exists() {
                info!(path = %result_path.display(), "overwriting prior seed result");
                fs::remove_file(&result_path)
                    .with_context(|| format!("delete {}", result_path.display()))?;
            }
            let traj = SeedTrajectory::decode(dir, &params)
                .with_context(|| format!("decoding seed in {}", dir.display()))?;
            let res = analyze_seed(traj, params)?;
            write_seed_result_auto(&result_path, &res)?;
            Ok(res)
        }
    }
}

/// Run the seed scan over one parameter directory.
///
/// Every seed subdirectory is analyzed (in parallel); seeds that fail are
/// skipped with a warning and the scan folds the rest. The aggregate is
/// written to `<dir_name>_scan.json`, replacing any prior file.
pub fn run_seed_scan(param_dir: &Path, policy: Policy) -> Result<ScanResult> {
    if policy == Policy::Load {
        let seeds = collect_seed_results(param_dir)?;
        return finish_scan(param_dir, &seeds);
    }

    let seed_dirs = subdirs(param_dir)?;
    let outcomes: Vec<(PathBuf, Result<SeedResult>)> = seed_dirs
        .par_iter()
        .map(|d| (d.clone(), analyze_seed_dir(d, policy)))
        .collect();

    let mut seeds = Vec::new();
    let mut failed = 0usize;
    for (dir, outcome) in outcomes {
        match outcome {
            Ok(r) => seeds.push(r),
            Err(e) => {
                failed += 1;
                warn!(dir = %dir.display(), error = %e, "seed failed; scan continues without it");
            }
        }
    }
    if failed > 0 {
        info!(failed, kept = seeds.len(), "seed scan proceeding with surviving seeds");
    }
    seeds.sort_by_key(|s| s.seed);
    finish_scan(param_dir, &seeds)
}

fn finish_scan(param_dir: &Path, seeds: &[SeedResult]) -> Result<ScanResult> {
    if seeds.is_empty() {
        bail!("no usable seeds under {}", param_dir.display());
    }
    let scan = aggregate(seeds)?;

    let name = param_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("scan");
    let out = param_dir.join(format!("{name}_scan.json"));
    if out.exists() {
        fs::remove_file(&out).with_context(|| format!("delete {}", out.display()))?;
    }
    write_scan_result_auto(&out, &scan)?;
    info!(seeds = scan.n_seeds, out = %out.display(), "seed scan written");
    Ok(scan)
}

/// Outcome of a whole-tree parameter scan.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Parameter directories whose scan completed.
    pub completed: Vec<PathBuf>,
    /// Failed directories with their error descriptions.
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    /// Whether every unit completed.
    #[inline]
    #[must_use]
    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run seed scans over every parameter directory under `root`.
///
/// Directories are ordered by the numeric suffix of their name (the swept
/// parameter value), then lexically. A failing directory is reported and
/// the batch continues with the next one.
pub fn run_param_scan(root: &Path, policy: Policy) -> Result<BatchReport> {
    let mut dirs = subdirs(root)?;
    dirs.sort_by(|a, b| {
        let key = |p: &Path| {
            p.file_name()
                .and_then(|n| n.to_str())
                .and_then(trailing_number)
        };
        key(a)
            .partial_cmp(&key(b))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.cmp(b))
    });

    let mut report = BatchReport::default();
    for dir in dirs {
        match run_seed_scan(&dir, policy) {
            Ok(_) => report.completed.push(dir),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "parameter directory failed; batch continues");
                report.failed.push((dir, format!("{e:#}")));
            }
        }
    }
    Ok(report)
}
