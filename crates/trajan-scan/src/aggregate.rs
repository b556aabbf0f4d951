//! Fold a validated seed set into cross-seed scan statistics.

use crate::stats::{
    aggregate_components, aggregate_magnitudes, mean_std_array, mean_std_grid,
    mean_std_hist_pair, mean_std_scalar, mean_std_vec3_pairs,
};
use crate::validate::validate_homogeneous;
use trajan_core::error::ScanError;
use trajan_core::result::{ScanResult, SeedResult};

/// Aggregate per-seed results into element-wise mean/std scan series.
///
/// Input order does not matter: seeds are re-sorted by seed id before the
/// fold, so the output is identical for any permutation of the same set.
/// The per-seed extension histograms are deliberately not aggregated:
/// their grids are seed-dependent (span follows each seed's maximum).
pub fn aggregate(seeds: &[SeedResult]) -> Result<ScanResult, ScanError> {
    let mut sorted: Vec<&SeedResult> = seeds.iter().collect();
    sorted.sort_by_key(|s| s.seed);
    validate_homogeneous(&sorted)?;
    let first = sorted[0];

    let zeroth: Vec<&[f64]> = sorted.iter().map(|s| s.zeroth_moment.as_slice()).collect();
    let firsts: Vec<&[[f64; 2]]> = sorted.iter().map(|s| s.first_moments.as_slice()).collect();
    let seconds: Vec<&[[f64; 3]]> =
        sorted.iter().map(|s| s.second_moments.as_slice()).collect();
    let sgl_num: Vec<&[[f64; 2]]> =
        sorted.iter().map(|s| s.singly_bound_number.as_slice()).collect();
    let sgl_distr: Vec<&[Vec<f64>; 2]> =
        sorted.iter().map(|s| &s.singly_bound_distr.counts).collect();
    let dbl_distr: Vec<&Vec<Vec<f64>>> =
        sorted.iter().map(|s| &s.doubly_bound_distr.counts).collect();
    let forces: Vec<&[_]> = sorted.iter().map(|s| s.forces.as_slice()).collect();
    let torques: Vec<&[_]> = sorted.iter().map(|s| s.torques.as_slice()).collect();
    let lin_work: Vec<&[[f64; 2]]> = sorted.iter().map(|s| s.linear_work.as_slice()).collect();
    let rot_work: Vec<&[[f64; 2]]> =
        sorted.iter().map(|s| s.rotational_work.as_slice()).collect();
    let fil_sep: Vec<&[_]> = sorted.iter().map(|s| s.fil_separation.as_slice()).collect();
    let fil_ang: Vec<&[f64]> = sorted.iter().map(|s| s.fil_angle.as_slice()).collect();

    // The scan's provenance snapshot is not any one seed's.
    let mut params = first.params.clone();
    params.seed = 0;

    Ok(ScanResult {
        params,
        n_seeds: sorted.len(),
        time: first.time.clone(),
        zeroth_moment: mean_std_scalar(&zeroth),
        first_moments: mean_std_array(&firsts),
        second_moments: mean_std_array(&seconds),
        singly_bound_number: mean_std_array(&sgl_num),
        singly_bound_distr: mean_std_hist_pair(&sgl_distr),
        sgl_edges: first.singly_bound_distr.edges.clone(),
        doubly_bound_distr: mean_std_grid(&dbl_distr),
        xedges: first.doubly_bound_distr.xedges.clone(),
        yedges: first.doubly_bound_distr.yedges.clone(),
        forces: aggregate_components(&forces),
        force_magnitude: aggregate_magnitudes(&forces),
        torques: mean_std_vec3_pairs(&torques),
        linear_work: mean_std_array(&lin_work),
        rotational_work: mean_std_array(&rot_work),
        fil_separation: aggregate_components(&fil_sep),
        fil_angle: mean_std_scalar(&fil_ang),
    })
}
