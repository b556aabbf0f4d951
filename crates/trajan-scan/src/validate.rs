//! Homogeneity validation of a seed set before aggregation.
//!
//! Element-wise statistics over misaligned arrays are meaningless, so any
//! disagreement on parameter provenance, frame count, or histogram bin
//! edges is fatal for the whole aggregate; no partial result is produced.

use trajan_core::error::ScanError;
use trajan_core::result::SeedResult;

fn mismatch(what: impl Into<String>) -> ScanError {
    ScanError::AggregationMismatch { what: what.into() }
}

fn edges_equal(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
}

/// Check that every seed can be folded with the first one.
pub fn validate_homogeneous(seeds: &[&SeedResult]) -> Result<(), ScanError> {
    let Some(first) = seeds.first() else {
        return Err(mismatch("empty seed set"));
    };

    for s in &seeds[1..] {
        if !s.params.same_provenance(&first.params) {
            return Err(mismatch(format!(
                "seed {} has different parameter provenance than seed {}",
                s.seed, first.seed
            )));
        }
        if s.time.len() != first.time.len() {
            return Err(mismatch(format!(
                "seed {} has {} frames, seed {} has {}",
                s.seed,
                s.time.len(),
                first.seed,
                first.time.len()
            )));
        }
        if !edges_equal(&s.singly_bound_distr.edges, &first.singly_bound_distr.edges) {
            return Err(mismatch(format!(
                "seed {} disagrees on singly-bound bin edges",
                s.seed
            )));
        }
        if !edges_equal(&s.doubly_bound_distr.xedges, &first.doubly_bound_distr.xedges)
            || !edges_equal(&s.doubly_bound_distr.yedges, &first.doubly_bound_distr.yedges)
        {
            return Err(mismatch(format!(
                "seed {} disagrees on doubly-bound bin edges",
                s.seed
            )));
        }
    }
    Ok(())
}
