//! Histogram estimates of bound-head densities and crosslinker extension.
//!
//! Pooled histograms are scaled by `n_spec / n_steps` so summing over the
//! run yields a time-averaged density estimate. Binning follows the usual
//! convention: half-open bins, right edge of the last bin inclusive,
//! out-of-range samples dropped.

use trajan_core::result::{DoublyDistr, SinglyDistr, StretchDistr};
use trajan_trace::BoundLambdas;

/// Bin count of the singly-bound head histograms.
pub const SGL_BINS: usize = 50;
/// Default edge count of the doubly-bound 2D histogram (⇒ 119 bins).
pub const DBL_EDGES: usize = 120;
/// Bin width of the extension histograms.
pub const STRETCH_STEP: f64 = 0.004;

/// `n` evenly spaced points from `a` to `b` inclusive.
#[must_use]
pub fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    if n < 2 {
        return vec![a];
    }
    let step = (b - a) / (n - 1) as f64;
    (0..n).map(|i| a + step * i as f64).collect()
}

/// Map a sample to its bin index, or `None` when out of range.
#[inline]
fn bin_index(x: f64, edges: &[f64]) -> Option<usize> {
    let nbins = edges.len().checked_sub(1)?;
    if nbins == 0 {
        return None;
    }
    let (lo, hi) = (edges[0], edges[nbins]);
    if x < lo || x > hi {
        return None;
    }
    let idx = ((x - lo) / (hi - lo) * nbins as f64) as usize;
    Some(idx.min(nbins - 1))
}

/// Histogram of `values` over `edges` (`edges.len() - 1` bins).
#[must_use]
pub fn histogram(values: &[f64], edges: &[f64]) -> Vec<f64> {
    let nbins = edges.len().saturating_sub(1);
    let mut counts = vec![0.0; nbins];
    for &x in values {
        if let Some(i) = bin_index(x, edges) {
            counts[i] += 1.0;
        }
    }
    counts
}

/// 2D histogram of paired samples; a pair lands in a cell only when both
/// coordinates are in range.
#[must_use]
pub fn histogram2d(xs: &[f64], ys: &[f64], xedges: &[f64], yedges: &[f64]) -> Vec<Vec<f64>> {
    let nx = xedges.len().saturating_sub(1);
    let ny = yedges.len().saturating_sub(1);
    let mut counts = vec![vec![0.0; ny]; nx];
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        if let (Some(i), Some(j)) = (bin_index(x, xedges), bin_index(y, yedges)) {
            counts[i][j] += 1.0;
        }
    }
    counts
}

/// Time-averaged singly-bound head density per filament.
///
/// All frames are pooled into [`SGL_BINS`] bins spanning the half-length
/// range, then scaled by `n_spec / n_steps`.
#[must_use]
pub fn singly_bound_distr(
    bound: &[BoundLambdas],
    half_length: f64,
    n_spec: u64,
    n_steps: i32,
) -> SinglyDistr {
    let edges = linspace(-half_length, half_length, SGL_BINS + 1);
    let scale = density_scale(n_spec, n_steps);

    let mut counts: [Vec<f64>; 2] = Default::default();
    for slot in 0..2 {
        let pooled: Vec<f64> =
            bound.iter().flat_map(|b| b.singly[slot].iter().copied()).collect();
        let mut c = histogram(&pooled, &edges);
        for v in &mut c {
            *v *= scale;
        }
        counts[slot] = c;
    }
    SinglyDistr { counts, edges }
}

/// Time-averaged doubly-bound pair density over `(λ_i, λ_j)`.
#[must_use]
pub fn doubly_bound_distr(
    bound: &[BoundLambdas],
    half_length: f64,
    n_spec: u64,
    n_steps: i32,
    n_edges: usize,
) -> DoublyDistr {
    let edges = linspace(-half_length, half_length, n_edges);
    let xs: Vec<f64> = bound.iter().flat_map(|b| b.doubly[0].iter().copied()).collect();
    let ys: Vec<f64> = bound.iter().flat_map(|b| b.doubly[1].iter().copied()).collect();

    let mut counts = histogram2d(&xs, &ys, &edges, &edges);
    let scale = density_scale(n_spec, n_steps);
    for row in &mut counts {
        for v in row {
            *v *= scale;
        }
    }
    DoublyDistr { counts, xedges: edges.clone(), yedges: edges }
}

/// Per-frame extension histograms over a shared grid.
///
/// The grid runs from 0 past the largest observed extension in
/// [`STRETCH_STEP`] increments, so its span is seed-dependent.
#[must_use]
pub fn stretch_distr(stretches: &[Vec<f64>]) -> StretchDistr {
    let max = stretches
        .iter()
        .flatten()
        .copied()
        .fold(0.0f64, f64::max);

    let mut edges = Vec::new();
    let mut x = 0.0;
    while x < max + 2.0 * STRETCH_STEP {
        edges.push(x);
        x += STRETCH_STEP;
    }

    let per_frame = stretches.iter().map(|s| histogram(s, &edges)).collect();
    StretchDistr { per_frame, edges }
}

#[inline]
fn density_scale(n_spec: u64, n_steps: i32) -> f64 {
    if n_steps <= 0 {
        0.0
    } else {
        n_spec as f64 / f64::from(n_steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_endpoints_and_count() {
        let e = linspace(-5.0, 5.0, 120);
        assert_eq!(e.len(), 120);
        assert!((e[0] + 5.0).abs() < 1e-12);
        assert!((e[119] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn histogram_right_edge_inclusive() {
        let edges = vec![0.0, 1.0, 2.0];
        let counts = histogram(&[0.0, 0.5, 1.0, 2.0, 2.5], &edges);
        // 2.5 out of range; 1.0 lands in the second bin; 2.0 in the last.
        assert_eq!(counts, vec![2.0, 2.0]);
    }

    #[test]
    fn doubly_distr_has_119_bins_by_default() {
        let bound = vec![BoundLambdas {
            singly: Default::default(),
            doubly: [vec![-3.0], vec![-4.9]],
        }];
        let d = doubly_bound_distr(&bound, 5.0, 100, 100, DBL_EDGES);
        assert_eq!(d.xedges.len(), 120);
        assert_eq!(d.counts.len(), 119);
        assert_eq!(d.counts[0].len(), 119);
        let total: f64 = d.counts.iter().flatten().sum();
        assert!((total - 1.0).abs() < 1e-12, "scale 100/100 keeps one pair");
    }

    #[test]
    fn singly_distr_scales_by_species_per_step() {
        let bound = vec![BoundLambdas {
            singly: [vec![0.0, 1.0], vec![]],
            doubly: Default::default(),
        }];
        let d = singly_bound_distr(&bound, 5.0, 50, 100);
        let total: f64 = d.counts[0].iter().sum();
        assert!((total - 2.0 * 0.5).abs() < 1e-12);
        assert_eq!(d.edges.len(), SGL_BINS + 1);
    }

    #[test]
    fn stretch_grid_spans_past_the_maximum() {
        let s = vec![vec![0.01, 0.002], vec![0.0095]];
        let d = stretch_distr(&s);
        assert!(*d.edges.last().unwrap() >= 0.01);
        assert_eq!(d.per_frame.len(), 2);
        let f0: f64 = d.per_frame[0].iter().sum();
        assert_eq!(f0, 2.0);
    }
}
