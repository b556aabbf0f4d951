//! Serialization helpers for results and store snapshots.
//!
//! JSON and CBOR read/write utilities with extension-based auto-detection.
//! Unknown/missing extensions are rejected for reads and default to JSON
//! for writes.

use crate::result::{ScanResult, SeedResult};
use crate::store::MemStore;
use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Ensure the parent directory for a file exists (no-op if none).
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating parent directory {}", display(path)))?;
        }
    }
    Ok(())
}

/* ---------------- generic JSON/CBOR plumbing ---------------- */

fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P, what: &str) -> Result<T> {
    let path_ref = path.as_ref();
    let f = File::open(path_ref).with_context(|| format!("open {}", display(path_ref)))?;
    let rdr = BufReader::new(f);
    serde_json::from_reader(rdr).with_context(|| format!("deserialize JSON {what}"))
}

fn write_json<T: Serialize, P: AsRef<Path>>(path: P, v: &T, what: &str) -> Result<()> {
    let path_ref = path.as_ref();
    ensure_parent_dir(path_ref)?;
    let f = File::create(path_ref).with_context(|| format!("create {}", display(path_ref)))?;
    let w = BufWriter::new(f);
    serde_json::to_writer_pretty(w, v).with_context(|| format!("serialize JSON {what}"))
}

fn read_cbor<T: DeserializeOwned, P: AsRef<Path>>(path: P, what: &str) -> Result<T> {
    let path_ref = path.as_ref();
    let f = File::open(path_ref).with_context(|| format!("open {}", display(path_ref)))?;
    let mut rdr = BufReader::new(f);
    ciborium::de::from_reader(&mut rdr).with_context(|| format!("deserialize CBOR {what}"))
}

fn write_cbor<T: Serialize, P: AsRef<Path>>(path: P, v: &T, what: &str) -> Result<()> {
    let path_ref = path.as_ref();
    ensure_parent_dir(path_ref)?;
    let f = File::create(path_ref).with_context(|| format!("create {}", display(path_ref)))?;
    let mut w = BufWriter::new(f);
    ciborium::ser::into_writer(v, &mut w).with_context(|| format!("serialize CBOR {what}"))
}

fn read_auto<T: DeserializeOwned, P: AsRef<Path>>(path: P, what: &str) -> Result<T> {
    match ext_lower(path.as_ref()).as_deref() {
        Some("json") => read_json(path, what),
        Some("cbor") => read_cbor(path, what),
        Some(other) => Err(anyhow!(
            "unsupported {what} extension: {other} (supported: .json, .cbor)"
        )),
        None => Err(anyhow!("path has no extension (expected .json or .cbor)")),
    }
}

fn write_auto<T: Serialize, P: AsRef<Path>>(path: P, v: &T, what: &str) -> Result<()> {
    match ext_lower(path.as_ref()).as_deref() {
        Some("cbor") => write_cbor(path, v, what),
        _ => write_json(path, v, what),
    }
}

/* ---------------- SeedResult I/O ---------------- */

/// Read a [`SeedResult`] by extension (`.json` / `.cbor`, case-insensitive).
pub fn read_seed_result_auto<P: AsRef<Path>>(path: P) -> Result<SeedResult> {
    read_auto(path, "seed result")
}

/// Write a [`SeedResult`] by extension (defaults to JSON if unknown).
pub fn write_seed_result_auto<P: AsRef<Path>>(path: P, v: &SeedResult) -> Result<()> {
    write_auto(path, v, "seed result")
}

/* ---------------- ScanResult I/O ---------------- */

/// Read a [`ScanResult`] by extension.
pub fn read_scan_result_auto<P: AsRef<Path>>(path: P) -> Result<ScanResult> {
    read_auto(path, "scan result")
}

/// Write a [`ScanResult`] by extension (defaults to JSON if unknown).
pub fn write_scan_result_auto<P: AsRef<Path>>(path: P, v: &ScanResult) -> Result<()> {
    write_auto(path, v, "scan result")
}

/* ---------------- MemStore snapshots ---------------- */

/// Read a [`MemStore`] snapshot by extension.
pub fn read_store_auto<P: AsRef<Path>>(path: P) -> Result<MemStore> {
    read_auto(path, "store snapshot")
}

/// Write a [`MemStore`] snapshot by extension (defaults to JSON if unknown).
pub fn write_store_auto<P: AsRef<Path>>(path: P, v: &MemStore) -> Result<()> {
    write_auto(path, v, "store snapshot")
}

/* ---------------- small helpers ---------------- */

/// Return the lowercase extension (without dot) if present.
fn ext_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
}

/// Human-friendly path display for error messages.
fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
