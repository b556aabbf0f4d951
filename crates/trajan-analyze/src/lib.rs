//! trajan-analyze — per-seed numerical analysis of decoded trajectories.
//!
//! Inputs are fully decoded seeds (`trajan_trace::SeedTrajectory`); outputs
//! are typed time series aligned with the seed's time axis, assembled into
//! a `SeedResult`. Analyses compute lazily and pull in their own
//! prerequisites (work computes forces when absent), so callers can ask
//! for any output in any order.

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

/// Histogram estimates of head densities and extension.
pub mod distr;
/// Store export of decoded and analyzed seed data.
pub mod export;
/// Spring forces, torques, extension, trap restoring force.
pub mod forces;
/// Moments of bound-head positions.
pub mod moments;
/// Per-seed analysis driver and lazy cache.
pub mod seed;
/// Steady-state detection and interval helpers.
pub mod steady;
/// Trapezoidal work integration.
pub mod work;

pub use export::{seed_result_to_store, trajectory_to_store};
pub use seed::{analyze_seed, SeedAnalyzer, WorkSeries};
