//! trajan-scan — folding many stochastic seeds into scan statistics.
//!
//! A seed scan validates that its member seeds are homogeneous (same
//! parameter provenance, frame count, and histogram grids), then reduces
//! every per-seed series to element-wise mean/std pairs. Seeds load and
//! analyze in parallel; the fold itself is a deterministic batch
//! computation over the seed-id-sorted list. The parameter-scan driver
//! repeats this per parameter directory and keeps going past failing
//! units, reporting them at the end.

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

/// The mean/std fold over a validated seed set.
pub mod aggregate;
/// Seed-result discovery, loading, and ordering.
pub mod collect;
/// Seed-scan and parameter-scan drivers.
pub mod driver;
/// Element-wise reductions over the seed axis.
pub mod stats;
/// Homogeneity validation before aggregation.
pub mod validate;

pub use aggregate::aggregate;
pub use collect::{collect_seed_results, trailing_number};
pub use driver::{analyze_seed_dir, run_param_scan, run_seed_scan, BatchReport, Policy};
pub use stats::{aggregate_components, aggregate_magnitudes};
pub use validate::validate_homogeneous;

#[cfg(test)]
pub(crate) mod test_fixtures {
    use trajan_core::config::{FilamentParams, SimParams, XlinkParams};
    use trajan_core::result::{DoublyDistr, SeedResult, SinglyDistr, StretchDistr};
    use trajan_core::types::Vec3;

    /// A small, internally consistent seed result for reduction tests.
    pub fn seed_result(seed: u64, frames: usize) -> SeedResult {
        let params = SimParams {
            run_name: "fixture".into(),
            seed,
            anchor_id_offset: 1,
            rigid_filament: vec![FilamentParams {
                name: "fil".into(),
                length: 10.0,
                diameter: None,
                stationary_flag: None,
            }],
            crosslink: vec![XlinkParams {
                name: "xl".into(),
                concentration: None,
                k_spring: 2.0,
                n_spec: Some(10),
            }],
            optical_trap: vec![],
        };
        let s = seed as f64;
        SeedResult {
            seed,
            params,
            time: (0..frames).map(|i| i as f64 * 0.1).collect(),
            zeroth_moment: vec![s; frames],
            first_moments: vec![[s, -s]; frames],
            second_moments: vec![[s, s, s]; frames],
            singly_bound_number: vec![[1.0, 2.0]; frames],
            singly_bound_distr: SinglyDistr {
                counts: [vec![s, 0.0], vec![0.0, s]],
                edges: vec![-5.0, 0.0, 5.0],
            },
            doubly_bound_distr: DoublyDistr {
                counts: vec![vec![s, 0.0], vec![0.0, 0.0]],
                xedges: vec![-5.0, 0.0, 5.0],
                yedges: vec![-5.0, 0.0, 5.0],
            },
            stretch_distr: StretchDistr::default(),
            forces: vec![Vec3::new(s, 0.0, 0.0); frames],
            torques: vec![[Vec3::ZERO; 2]; frames],
            linear_work: vec![[0.0; 2]; frames],
            rotational_work: vec![[0.0; 2]; frames],
            fil_separation: vec![Vec3::new(1.0, 0.0, 0.0); frames],
            fil_angle: vec![0.0; frames],
            trap_force: None,
        }
    }
}
