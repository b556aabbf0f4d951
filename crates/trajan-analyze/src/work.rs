//! Mechanical work via trapezoidal time integration.
//!
//! Frame 0 has no prior frame, so both work components are exactly zero
//! there by definition.

use crate::forces::ForceTorque;
use trajan_core::result::TimeSeries;
use trajan_core::types::{Vec3, FIL_SLOTS};

/// Clamp a cosine into the `arccos` domain.
#[inline]
fn clamped_acos(c: f64) -> f64 {
    c.clamp(-1.0, 1.0).acos()
}

/// Incremental linear work on each filament per frame.
///
/// `dW[t] = ½ (Δr[t]·F[t-1] + Δr[t]·F[t])` with the force on filament i
/// being the negative of the stored (on-j) force.
#[must_use]
pub fn linear_work(
    fil_pos: &[[Vec3; FIL_SLOTS]],
    ft: &ForceTorque,
) -> TimeSeries<[f64; FIL_SLOTS]> {
    let n = fil_pos.len();
    let mut out = vec![[0.0; FIL_SLOTS]; n];
    for t in 1..n {
        for slot in 0..FIL_SLOTS {
            let dr = fil_pos[t][slot] - fil_pos[t - 1][slot];
            let sign = if slot == 0 { -1.0 } else { 1.0 };
            let f_prev = ft.force[t - 1] * sign;
            let f_cur = ft.force[t] * sign;
            out[t][slot] = 0.5 * (dr.dot(&f_prev) + dr.dot(&f_cur));
        }
    }
    out
}

/// Incremental rotational work on each filament per frame.
///
/// The small-rotation vector between consecutive orientations is
/// `normalize(u[t-1] × u[t])` scaled by `arccos(u[t-1]·u[t])`, dotted with
/// the torque at both ends of the interval.
#[must_use]
pub fn rotational_work(
    fil_orient: &[[Vec3; FIL_SLOTS]],
    ft: &ForceTorque,
) -> TimeSeries<[f64; FIL_SLOTS]> {
    let n = fil_orient.len();
    let mut out = vec![[0.0; FIL_SLOTS]; n];
    for t in 1..n {
        for slot in 0..FIL_SLOTS {
            let u_prev = fil_orient[t - 1][slot];
            let u_cur = fil_orient[t][slot];
            let angle = clamped_acos(u_cur.dot(&u_prev));
            let dtheta = u_prev.cross(&u_cur).normalized() * angle;
            let tau_prev = ft.torque[t - 1][slot];
            let tau_cur = ft.torque[t][slot];
            out[t][slot] = 0.5 * (dtheta.dot(&tau_prev) + dtheta.dot(&tau_cur));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_at_frame_zero_is_exactly_zero() {
        let pos = vec![[Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)]; 3];
        let orient = vec![[Vec3::new(1.0, 0.0, 0.0); 2]; 3];
        let ft = ForceTorque {
            force: vec![Vec3::new(-2.0, 0.0, 0.0); 3],
            torque: vec![[Vec3::new(0.0, 0.0, 1.0); 2]; 3],
        };
        let lw = linear_work(&pos, &ft);
        let rw = rotational_work(&orient, &ft);
        assert_eq!(lw[0], [0.0, 0.0]);
        assert_eq!(rw[0], [0.0, 0.0]);
    }

    #[test]
    fn constant_force_times_displacement() {
        // Filament j moves +x by 1 per frame under a constant force
        // (-2, 0, 0) on j: dW_j = -2 each frame; filament i is still.
        let mut pos = Vec::new();
        for t in 0..4 {
            pos.push([Vec3::ZERO, Vec3::new(t as f64, 0.0, 0.0)]);
        }
        let ft = ForceTorque {
            force: vec![Vec3::new(-2.0, 0.0, 0.0); 4],
            torque: vec![[Vec3::ZERO; 2]; 4],
        };
        let lw = linear_work(&pos, &ft);
        assert_eq!(lw[1], [0.0, -2.0]);
        assert_eq!(lw[3], [0.0, -2.0]);
    }

    #[test]
    fn rotation_in_plane_dots_with_torque() {
        // u rotates about z by 0.1 rad per frame; torque is ẑ: the
        // rotation vector is ẑ·0.1, so dW = 0.1 each step.
        let mut orient = Vec::new();
        for t in 0..3 {
            let a = 0.1 * t as f64;
            orient.push([Vec3::new(a.cos(), a.sin(), 0.0), Vec3::new(1.0, 0.0, 0.0)]);
        }
        let ft = ForceTorque {
            force: vec![Vec3::ZERO; 3],
            torque: vec![[Vec3::new(0.0, 0.0, 1.0); 2]; 3],
        };
        let rw = rotational_work(&orient, &ft);
        assert!((rw[1][0] - 0.1).abs() < 1e-9);
        assert!((rw[2][0] - 0.1).abs() < 1e-9);
        assert_eq!(rw[1][1], 0.0);
    }

    #[test]
    fn antiparallel_orientations_stay_finite() {
        // Numerical drift can push the dot product past ±1.
        let orient = vec![
            [Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)],
            [Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)],
        ];
        let ft = ForceTorque {
            force: vec![Vec3::ZERO; 2],
            torque: vec![[Vec3::new(0.0, 0.0, 1.0); 2]; 2],
        };
        let rw = rotational_work(&orient, &ft);
        assert!(rw[1][0].is_finite());
    }
}
