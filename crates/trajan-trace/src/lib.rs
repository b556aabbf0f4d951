//! trajan-trace — streaming decode of binary trajectory files.
//!
//! One frame loop serves all three stream formats: a 16-byte header, then
//! count-prefixed frames of fixed-size records (see `trajan_core::schema`).
//! On top of the raw reader sit the binding-state classifier, the
//! whole-seed decoder (slot re-ordering + lambda re-centering), and a
//! deterministic synthetic generator for tests and smoke runs.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]

/// Binding-state classification of crosslink frames.
pub mod classify;
/// Count-prefixed frame reader and per-format end-of-stream policy.
pub mod reader;
/// Whole-seed decoding (all streams, frame-aligned, slot-stable).
pub mod seed;
/// Synthetic seed generator (tests, CLI `simulate`).
pub mod synth;

pub use classify::{classify_frame, BoundLambdas, ClassifyStats};
pub use reader::{read_trajectory, EofPolicy, TrajectoryReader};
pub use seed::{SeedTrajectory, TrapSeries};
pub use synth::{generate_seed_files, SynthSpec};
