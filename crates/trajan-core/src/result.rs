//! Typed analysis results for one seed and for a seed scan.
//!
//! These structs replace the original store's dynamic attribute
//! dictionaries: every dataset the analysis produces has a named, typed
//! field, and provenance (the parameter snapshot and seed id) travels with
//! the data. A `SeedResult` is built once per decoded seed and persisted;
//! re-analysis rebuilds it from scratch. A `ScanResult` is derived
//! read-only from a fixed seed list and fully recomputed when the list
//! changes.

use crate::config::SimParams;
use crate::types::Vec3;
use serde::{Deserialize, Serialize};

/// Ordered per-frame values, aligned 1:1 with the seed's `time` axis.
pub type TimeSeries<T> = Vec<T>;

/// A 1D histogram per filament slot, pooled over all frames.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SinglyDistr {
    /// Scaled counts per bin, one row per filament.
    pub counts: [Vec<f64>; 2],
    /// Shared bin edges (`len == counts[_].len() + 1`).
    pub edges: Vec<f64>,
}

/// A 2D histogram of paired head positions, pooled over all frames.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DoublyDistr {
    /// Scaled counts, row-major `[x_bin][y_bin]`.
    pub counts: Vec<Vec<f64>>,
    /// Bin edges along the first filament.
    pub xedges: Vec<f64>,
    /// Bin edges along the second filament.
    pub yedges: Vec<f64>,
}

/// Per-frame histograms of crosslinker extension.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct StretchDistr {
    /// One histogram row per frame.
    pub per_frame: Vec<Vec<f64>>,
    /// Shared bin edges; their span depends on the seed's maximum
    /// extension, so scans do not aggregate this dataset.
    pub edges: Vec<f64>,
}

/// Optical-trap force series for one seed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrapForce {
    /// Time axis of the trap stream (may be shorter than the seed's).
    pub time: TimeSeries<f64>,
    /// Restoring force `k_trap * (trap - bead)` per frame.
    pub force: TimeSeries<Vec3>,
}

/// The full analysis output of one seed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SeedResult {
    /// Seed identifier (aggregation sorts by it).
    pub seed: u64,
    /// Parameter snapshot this seed ran with (provenance).
    pub params: SimParams,
    /// Time axis, `time[i] = i * n_posit * delta`.
    pub time: TimeSeries<f64>,

    /// Count of doubly-bound head pairs per frame.
    pub zeroth_moment: TimeSeries<f64>,
    /// `Σ λ` per filament per frame.
    pub first_moments: TimeSeries<[f64; 2]>,
    /// `[Σ λ_i λ_j, Σ λ_i², Σ λ_j²]` per frame.
    pub second_moments: TimeSeries<[f64; 3]>,
    /// Singly-bound head count per filament per frame.
    pub singly_bound_number: TimeSeries<[f64; 2]>,

    /// Time-averaged singly-bound head density.
    pub singly_bound_distr: SinglyDistr,
    /// Time-averaged doubly-bound pair density.
    pub doubly_bound_distr: DoublyDistr,
    /// Per-frame crosslinker extension histograms.
    pub stretch_distr: StretchDistr,

    /// Net crosslinker spring force on the second filament per frame
    /// (the first filament receives the opposite).
    pub forces: TimeSeries<Vec3>,
    /// Torque about each filament center per frame.
    pub torques: TimeSeries<[Vec3; 2]>,
    /// Incremental linear work on each filament per frame (index 0 is 0).
    pub linear_work: TimeSeries<[f64; 2]>,
    /// Incremental rotational work on each filament per frame (index 0 is 0).
    pub rotational_work: TimeSeries<[f64; 2]>,

    /// Filament center separation `r_j - r_i` per frame.
    pub fil_separation: TimeSeries<Vec3>,
    /// Inter-filament angle `arccos(u_i · u_j)` per frame.
    pub fil_angle: TimeSeries<f64>,

    /// Optical-trap force series, when the assay has a trap.
    pub trap_force: Option<TrapForce>,
}

impl SeedResult {
    /// Number of frames every aligned series carries.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.time.len()
    }
}

/// An element-wise mean/std pair over the seed axis.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct MeanStd<T> {
    /// Element-wise mean across seeds.
    pub mean: T,
    /// Element-wise population standard deviation across seeds.
    pub std: T,
}

impl<T> MeanStd<T> {
    /// Pair a mean with its standard deviation.
    #[inline]
    pub fn new(mean: T, std: T) -> Self {
        Self { mean, std }
    }
}

/// Cross-seed statistics over a validated-homogeneous set of seeds.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScanResult {
    /// Shared parameter snapshot (identical across member seeds).
    pub params: SimParams,
    /// How many seeds were folded in.
    pub n_seeds: usize,
    /// Shared time axis.
    pub time: TimeSeries<f64>,

    /// Doubly-bound pair count statistics.
    pub zeroth_moment: MeanStd<TimeSeries<f64>>,
    /// First-moment statistics.
    pub first_moments: MeanStd<TimeSeries<[f64; 2]>>,
    /// Second-moment statistics.
    pub second_moments: MeanStd<TimeSeries<[f64; 3]>>,
    /// Singly-bound count statistics.
    pub singly_bound_number: MeanStd<TimeSeries<[f64; 2]>>,

    /// Singly-bound density statistics (bins validated identical).
    pub singly_bound_distr: MeanStd<[Vec<f64>; 2]>,
    /// Shared singly-bound bin edges.
    pub sgl_edges: Vec<f64>,
    /// Doubly-bound density statistics (bins validated identical).
    pub doubly_bound_distr: MeanStd<Vec<Vec<f64>>>,
    /// Shared doubly-bound x edges.
    pub xedges: Vec<f64>,
    /// Shared doubly-bound y edges.
    pub yedges: Vec<f64>,

    /// Component-wise force statistics.
    pub forces: MeanStd<TimeSeries<Vec3>>,
    /// Magnitude-wise force statistics.
    pub force_magnitude: MeanStd<TimeSeries<f64>>,
    /// Component-wise torque statistics.
    pub torques: MeanStd<TimeSeries<[Vec3; 2]>>,
    /// Linear work statistics.
    pub linear_work: MeanStd<TimeSeries<[f64; 2]>>,
    /// Rotational work statistics.
    pub rotational_work: MeanStd<TimeSeries<[f64; 2]>>,

    /// Filament separation statistics (component-wise).
    pub fil_separation: MeanStd<TimeSeries<Vec3>>,
    /// Inter-filament angle statistics.
    pub fil_angle: MeanStd<TimeSeries<f64>>,
}
