//! Steady-state detection and interval helpers for analysis time series.

use trajan_core::result::TimeSeries;

/// Sign with a true zero class (unlike `f64::signum`, which maps 0 to 1).
#[inline]
fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// Index at which a series first reaches its steady-state average.
///
/// The series mean is removed `reps` times (a bounded loop, not a
/// recursion over an external parameter), then the first sign-change index
/// of the residual is returned, or 0 if the sign never changes (the system
/// was in steady state all along).
#[must_use]
pub fn find_start_time(arr: &[f64], reps: usize) -> usize {
    let mut work: Vec<f64> = arr.to_vec();
    for _ in 0..reps {
        let n = work.len();
        if n == 0 {
            return 0;
        }
        let mean = work.iter().sum::<f64>() / n as f64;
        for v in &mut work {
            *v -= mean;
        }
    }

    work.windows(2)
        .position(|w| sign(w[1]) != sign(w[0]))
        .unwrap_or(0)
}

/// Contiguous `true` runs of `cond` as `(start, end)` index pairs,
/// end-exclusive.
#[must_use]
pub fn contiguous_regions(cond: &[bool]) -> Vec<(usize, usize)> {
    let mut regions = Vec::new();
    let mut start = None;
    for (i, &c) in cond.iter().enumerate() {
        match (c, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                regions.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        regions.push((s, cond.len()));
    }
    regions
}

/// Numerical gradient with central differences in the interior and
/// one-sided differences at the ends.
#[must_use]
pub fn gradient(arr: &[f64], delta: f64) -> TimeSeries<f64> {
    let n = arr.len();
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..n)
            .map(|i| {
                if i == 0 {
                    (arr[1] - arr[0]) / delta
                } else if i == n - 1 {
                    (arr[n - 1] - arr[n - 2]) / delta
                } else {
                    (arr[i + 1] - arr[i - 1]) / (2.0 * delta)
                }
            })
            .collect(),
    }
}

/// Rising/falling intervals of a force trace.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForceIntervals {
    /// Numerical derivative of the input.
    pub deriv: TimeSeries<f64>,
    /// `(start, end)` index pairs where the derivative is positive.
    pub regions: Vec<(usize, usize)>,
    /// Lengths (in frames) of the rising intervals.
    pub rising: Vec<f64>,
    /// Lengths (in frames) of the gaps between rising intervals.
    pub falling: Vec<f64>,
}

/// Split a series into rising and falling intervals of its derivative.
#[must_use]
pub fn force_intervals(arr: &[f64], delta: f64) -> ForceIntervals {
    let deriv = gradient(arr, delta);
    let positive: Vec<bool> = deriv.iter().map(|&d| d > 0.0).collect();
    let regions = contiguous_regions(&positive);

    let rising = regions.iter().map(|&(s, e)| (e - s) as f64).collect();
    let falling = regions
        .windows(2)
        .map(|w| (w[1].0 - w[0].1) as f64)
        .collect();

    ForceIntervals { deriv, regions, rising, falling }
}
