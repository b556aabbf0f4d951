//! trajan-core — record schema, typed configuration, results, and I/O.
//!
//! This crate defines the **stable boundary** used across trajan crates:
//! - canonical value types (`Header`, `CrosslinkRecord`, …) and the packed
//!   binary layouts that produce them,
//! - the structured error taxonomy (decode / aggregation / configuration),
//! - typed parameter snapshots ([`config::SimParams`]),
//! - typed analysis results ([`result::SeedResult`], [`result::ScanResult`]),
//! - the hierarchical dataset-store abstraction, and
//! - JSON/CBOR persistence with extension auto-detection.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Small, explicit allowlist to keep docs readable and APIs ergonomic.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::doc_markdown
)]

/// Typed simulation parameters and conventional file names.
pub mod config;
/// Structured decode/aggregation/configuration errors.
pub mod error;
/// JSON/CBOR helpers and auto-detecting read/write APIs.
pub mod io;
/// Typed per-seed and per-scan analysis results.
pub mod result;
/// Packed binary record layouts and the `RecordLayout` trait.
pub mod schema;
/// Hierarchical dataset-store abstraction and in-memory implementation.
pub mod store;
/// Canonical value types shared across the workspace.
pub mod types;

// ---- Re-exports for workspace compatibility ----
pub use config::*;
pub use error::*;
pub use io::*;
pub use result::*;
pub use schema::*;
pub use store::*;
pub use types::*;

/// Commonly-used items for quick imports.
///
/// ```rust
/// use trajan_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::SimParams;
    pub use crate::error::{ConfigError, DecodeError, ScanError};
    pub use crate::result::{ScanResult, SeedResult};
    pub use crate::schema::{RecordKind, RecordLayout};
    pub use crate::types::*;
}
