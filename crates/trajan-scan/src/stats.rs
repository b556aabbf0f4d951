//! Element-wise mean/std reductions over the seed axis.
//!
//! Every reduction is a plain left-to-right fold over a caller-sorted seed
//! list, so aggregating the same seeds in any input order produces
//! identical output. Standard deviations are population (ddof = 0).
//!
//! Vector-valued series support two distinct, named reductions:
//! [`aggregate_components`] (per x/y/z component) and
//! [`aggregate_magnitudes`] (per Euclidean norm). Different callers need
//! different ones; they are never conflated.

use trajan_core::result::MeanStd;
use trajan_core::types::Vec3;

/// Mean and population std of one column of samples.
fn column_mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Reduce scalar series (seeds × frames) element-wise.
#[must_use]
pub fn mean_std_scalar(series: &[&[f64]]) -> MeanStd<Vec<f64>> {
    let frames = series.first().map_or(0, |s| s.len());
    let mut mean = Vec::with_capacity(frames);
    let mut std = Vec::with_capacity(frames);
    for t in 0..frames {
        let col: Vec<f64> = series.iter().map(|s| s[t]).collect();
        let (m, s) = column_mean_std(&col);
        mean.push(m);
        std.push(s);
    }
    MeanStd::new(mean, std)
}

/// Reduce fixed-width array series (seeds × frames × N) element-wise.
#[must_use]
pub fn mean_std_array<const N: usize>(series: &[&[[f64; N]]]) -> MeanStd<Vec<[f64; N]>> {
    let frames = series.first().map_or(0, |s| s.len());
    let mut mean = Vec::with_capacity(frames);
    let mut std = Vec::with_capacity(frames);
    for t in 0..frames {
        let mut m = [0.0; N];
        let mut s = [0.0; N];
        for k in 0..N {
            let col: Vec<f64> = series.iter().map(|sr| sr[t][k]).collect();
            let (cm, cs) = column_mean_std(&col);
            m[k] = cm;
            s[k] = cs;
        }
        mean.push(m);
        std.push(s);
    }
    MeanStd::new(mean, std)
}

/// Mean/std of one frame's vectors across seeds, per component.
fn vec3_column(column: &[Vec3]) -> (Vec3, Vec3) {
    let (mx, sx) = column_mean_std(&column.iter().map(|v| v.x).collect::<Vec<_>>());
    let (my, sy) = column_mean_std(&column.iter().map(|v| v.y).collect::<Vec<_>>());
    let (mz, sz) = column_mean_std(&column.iter().map(|v| v.z).collect::<Vec<_>>());
    (Vec3::new(mx, my, mz), Vec3::new(sx, sy, sz))
}

/// Component-wise reduction of vector series (seeds × frames).
#[must_use]
pub fn aggregate_components(series: &[&[Vec3]]) -> MeanStd<Vec<Vec3>> {
    let frames = series.first().map_or(0, |s| s.len());
    let mut mean = Vec::with_capacity(frames);
    let mut std = Vec::with_capacity(frames);
    for t in 0..frames {
        let col: Vec<Vec3> = series.iter().map(|s| s[t]).collect();
        let (m, s) = vec3_column(&col);
        mean.push(m);
        std.push(s);
    }
    MeanStd::new(mean, std)
}

/// Magnitude-wise reduction of vector series (seeds × frames).
#[must_use]
pub fn aggregate_magnitudes(series: &[&[Vec3]]) -> MeanStd<Vec<f64>> {
    let mags: Vec<Vec<f64>> = series
        .iter()
        .map(|s| s.iter().map(Vec3::norm).collect())
        .collect();
    let refs: Vec<&[f64]> = mags.iter().map(Vec::as_slice).collect();
    mean_std_scalar(&refs)
}

/// Reduce paired-vector series (seeds × frames × 2 slots) component-wise.
#[must_use]
pub fn mean_std_vec3_pairs(series: &[&[[Vec3; 2]]]) -> MeanStd<Vec<[Vec3; 2]>> {
    let frames = series.first().map_or(0, |s| s.len());
    let mut mean = Vec::with_capacity(frames);
    let mut std = Vec::with_capacity(frames);
    for t in 0..frames {
        let mut m = [Vec3::ZERO; 2];
        let mut s = [Vec3::ZERO; 2];
        for slot in 0..2 {
            let col: Vec<Vec3> = series.iter().map(|sr| sr[t][slot]).collect();
            let (cm, cs) = vec3_column(&col);
            m[slot] = cm;
            s[slot] = cs;
        }
        mean.push(m);
        std.push(s);
    }
    MeanStd::new(mean, std)
}

/// Reduce per-filament 1D histograms (seeds × 2 × bins).
#[must_use]
pub fn mean_std_hist_pair(series: &[&[Vec<f64>; 2]]) -> MeanStd<[Vec<f64>; 2]> {
    let mut mean: [Vec<f64>; 2] = Default::default();
    let mut std: [Vec<f64>; 2] = Default::default();
    for slot in 0..2 {
        let bins = series.first().map_or(0, |s| s[slot].len());
        for b in 0..bins {
            let col: Vec<f64> = series.iter().map(|s| s[slot][b]).collect();
            let (m, sd) = column_mean_std(&col);
            mean[slot].push(m);
            std[slot].push(sd);
        }
    }
    MeanStd::new(mean, std)
}

/// Reduce 2D histograms (seeds × nx × ny) element-wise.
#[must_use]
pub fn mean_std_grid(series: &[&Vec<Vec<f64>>]) -> MeanStd<Vec<Vec<f64>>> {
    let nx = series.first().map_or(0, |g| g.len());
    let ny = series.first().map_or(0, |g| g.first().map_or(0, Vec::len));
    let mut mean = vec![vec![0.0; ny]; nx];
    let mut std = vec![vec![0.0; ny]; nx];
    for i in 0..nx {
        for j in 0..ny {
            let col: Vec<f64> = series.iter().map(|g| g[i][j]).collect();
            let (m, s) = column_mean_std(&col);
            mean[i][j] = m;
            std[i][j] = s;
        }
    }
    MeanStd::new(mean, std)
}
