//! Collection of per-seed result files from a scan directory tree.
//!
//! Layout: `<param_dir>/<seed_dir>/<run>_result.{json,cbor}`. Hidden
//! directories are skipped, loads run in parallel, and the returned list
//! is sorted ascending by seed id so downstream folds are deterministic
//! regardless of filesystem enumeration order.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use trajan_core::io::read_seed_result_auto;
use trajan_core::result::SeedResult;

/// Non-hidden subdirectories of `dir`, sorted by name.
pub fn subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let entries = fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if path.is_dir() && !hidden {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Result files (`*_result.json` / `*_result.cbor`) directly inside `dir`.
fn result_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let entries = fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with("_result.json") || name.ends_with("_result.cbor") {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Load every seed result under `param_dir`, sorted ascending by seed id.
///
/// A file that fails to load is skipped with a warning; the scan proceeds
/// with the seeds that do load.
pub fn collect_seed_results(param_dir: &Path) -> Result<Vec<SeedResult>> {
    let mut files = Vec::new();
    for sub in subdirs(param_dir)? {
        files.extend(result_files(&sub)?);
    }

    let mut seeds: Vec<SeedResult> = files
        .par_iter()
        .filter_map(|path| match read_seed_result_auto(path) {
            Ok(r) => Some(r),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable seed result");
                None
            }
        })
        .collect();

    seeds.sort_by_key(|s| s.seed);
    Ok(seeds)
}

/// Trailing numeric suffix of a directory name (`Edep0.5` → `0.5`),
/// used to order parameter directories by their swept value.
#[must_use]
pub fn trailing_number(name: &str) -> Option<f64> {
    let bytes = name.as_bytes();
    let mut end = bytes.len();
    while end > 0 && !bytes[end - 1].is_ascii_digit() {
        end -= 1;
    }
    if end == 0 {
        return None;
    }
    let mut start = end;
    while start > 0 {
        let c = bytes[start - 1] as char;
        if c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E') {
            start -= 1;
        } else {
            break;
        }
    }
    // Widest suffix that parses wins.
    (start..end).find_map(|s| name[s..end].parse::<f64>().ok())
}
