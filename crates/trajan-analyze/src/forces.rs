//! Crosslinker spring forces, torques, extension, and trap restoring force.

use trajan_core::result::TimeSeries;
use trajan_core::types::Vec3;
use trajan_trace::{SeedTrajectory, TrapSeries};

/// Zero-rest-length spring force on filament j from one crosslinker:
/// `F = -k_s ((r_j + u_j s_j) - (r_i + u_i s_i))`.
#[inline]
#[must_use]
pub fn spring_force(
    r_i: Vec3,
    r_j: Vec3,
    u_i: Vec3,
    u_j: Vec3,
    s_i: f64,
    s_j: f64,
    k_s: f64,
) -> Vec3 {
    (r_j + u_j * s_j - r_i - u_i * s_i) * (-k_s)
}

/// Crosslinker extension: distance between the two head attachment points.
#[inline]
#[must_use]
pub fn spring_stretch(r_i: Vec3, r_j: Vec3, u_i: Vec3, u_j: Vec3, s_i: f64, s_j: f64) -> f64 {
    (r_j + u_j * s_j - r_i - u_i * s_i).norm()
}

/// Per-frame net force (on filament j) and torques about both filament
/// centers, summed over doubly-bound crosslinkers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForceTorque {
    /// Net force on the second filament; the first receives the opposite.
    pub force: TimeSeries<Vec3>,
    /// Torque about each filament center.
    pub torque: TimeSeries<[Vec3; 2]>,
}

/// Accumulate spring forces and torques over every doubly-bound pair.
#[must_use]
pub fn compute_forces(traj: &SeedTrajectory, k_s: f64) -> ForceTorque {
    let n = traj.frame_count();
    let mut force = vec![Vec3::ZERO; n];
    let mut torque = vec![[Vec3::ZERO; 2]; n];

    for t in 0..n {
        let [r_i, r_j] = traj.fil_pos[t];
        let [u_i, u_j] = traj.fil_orient[t];
        let b = &traj.bound[t];
        for (&s_i, &s_j) in b.doubly[0].iter().zip(b.doubly[1].iter()) {
            let f = spring_force(r_i, r_j, u_i, u_j, s_i, s_j, k_s);
            force[t] += f;
            torque[t][0] += (u_i * s_i).cross(&-f);
            torque[t][1] += (u_j * s_j).cross(&f);
        }
    }

    ForceTorque { force, torque }
}

/// Per-frame extension lists over every doubly-bound pair.
#[must_use]
pub fn stretch_series(traj: &SeedTrajectory) -> Vec<Vec<f64>> {
    (0..traj.frame_count())
        .map(|t| {
            let [r_i, r_j] = traj.fil_pos[t];
            let [u_i, u_j] = traj.fil_orient[t];
            let b = &traj.bound[t];
            b.doubly[0]
                .iter()
                .zip(b.doubly[1].iter())
                .map(|(&s_i, &s_j)| spring_stretch(r_i, r_j, u_i, u_j, s_i, s_j))
                .collect()
        })
        .collect()
}

/// Optical-trap restoring force on the bead: `k_trap (trap - bead)`.
#[must_use]
pub fn trap_force(trap: &TrapSeries, k_trap: f64) -> TimeSeries<Vec3> {
    trap.trap_pos
        .iter()
        .zip(trap.bead_pos.iter())
        .map(|(&t, &b)| (t - b) * k_trap)
        .collect()
}
