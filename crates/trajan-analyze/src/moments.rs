//! Statistical moments of bound-head positions.
//!
//! All inputs are the classified, re-centered per-frame lambda lists; all
//! outputs align 1:1 with the seed's time axis.

use trajan_core::result::TimeSeries;
use trajan_trace::BoundLambdas;

/// Zeroth moment: count of doubly-bound head pairs per frame.
///
/// The two doubly-bound lists are index-paired, so either one's length is
/// the pair count.
#[must_use]
pub fn zeroth_moment(bound: &[BoundLambdas]) -> TimeSeries<f64> {
    bound.iter().map(|b| b.doubly[0].len() as f64).collect()
}

/// Singly-bound head count per filament per frame.
#[must_use]
pub fn singly_bound_number(bound: &[BoundLambdas]) -> TimeSeries<[f64; 2]> {
    bound
        .iter()
        .map(|b| [b.singly[0].len() as f64, b.singly[1].len() as f64])
        .collect()
}

/// First moments: `Σ λ` per filament per frame.
#[must_use]
pub fn first_moments(bound: &[BoundLambdas]) -> TimeSeries<[f64; 2]> {
    bound
        .iter()
        .map(|b| [b.doubly[0].iter().sum(), b.doubly[1].iter().sum()])
        .collect()
}

/// Second moments per frame: `[Σ λ_i λ_j, Σ λ_i², Σ λ_j²]`.
///
/// The cross moment pairs entries by in-frame index (decode order), which
/// the classifier guarantees is consistent for the two lists.
#[must_use]
pub fn second_moments(bound: &[BoundLambdas]) -> TimeSeries<[f64; 3]> {
    bound
        .iter()
        .map(|b| {
            let mu11 = b.doubly[0]
                .iter()
                .zip(b.doubly[1].iter())
                .map(|(li, lj)| li * lj)
                .sum();
            let mu20 = b.doubly[0].iter().map(|l| l * l).sum();
            let mu02 = b.doubly[1].iter().map(|l| l * l).sum();
            [mu11, mu20, mu02]
        })
        .collect()
}
