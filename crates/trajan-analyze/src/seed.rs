//! Per-seed analysis driver.
//!
//! [`SeedAnalyzer`] owns one decoded trajectory and computes each analysis
//! lazily, caching the result. A step whose prerequisite has not been
//! computed yet simply computes it; a missing prerequisite is never an
//! error. [`analyze_seed`] runs everything and assembles a
//! [`SeedResult`].

use crate::distr::{doubly_bound_distr, singly_bound_distr, stretch_distr, DBL_EDGES};
use crate::forces::{compute_forces, stretch_series, trap_force, ForceTorque};
use crate::moments::{first_moments, second_moments, singly_bound_number, zeroth_moment};
use crate::work::{linear_work, rotational_work};
use anyhow::Result;
use trajan_core::config::SimParams;
use trajan_core::result::{SeedResult, TimeSeries, TrapForce};
use trajan_core::types::{Vec3, FIL_SLOTS};
use trajan_trace::SeedTrajectory;

/// Linear and rotational incremental work, paired because they share the
/// force/torque prerequisite.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkSeries {
    /// Linear work per filament per frame.
    pub linear: TimeSeries<[f64; FIL_SLOTS]>,
    /// Rotational work per filament per frame.
    pub rotational: TimeSeries<[f64; FIL_SLOTS]>,
}

/// Return the cached value in `slot`, computing it on first use.
fn get_or_compute<T>(slot: &mut Option<T>, compute: impl FnOnce() -> T) -> &T {
    if slot.is_none() {
        *slot = Some(compute());
    }
    match slot {
        Some(v) => v,
        // Populated just above.
        None => unreachable!(),
    }
}

/// Lazy per-seed analysis over one decoded trajectory.
#[derive(Debug)]
pub struct SeedAnalyzer {
    traj: SeedTrajectory,
    params: SimParams,
    k_spring: f64,
    forces: Option<ForceTorque>,
    work: Option<WorkSeries>,
    stretches: Option<Vec<Vec<f64>>>,
}

impl SeedAnalyzer {
    /// Wrap a decoded trajectory with its parameter snapshot.
    pub fn new(traj: SeedTrajectory, params: SimParams) -> Result<Self> {
        let k_spring = params.crosslink()?.k_spring;
        Ok(Self { traj, params, k_spring, forces: None, work: None, stretches: None })
    }

    /// The decoded trajectory under analysis.
    #[inline]
    #[must_use]
    pub const fn trajectory(&self) -> &SeedTrajectory {
        &self.traj
    }

    /// Spring forces and torques, computed once.
    pub fn forces(&mut self) -> &ForceTorque {
        let Self { traj, forces, k_spring, .. } = self;
        get_or_compute(forces, || compute_forces(traj, *k_spring))
    }

    /// Mechanical work; computes forces first when they are absent.
    pub fn work(&mut self) -> &WorkSeries {
        if self.work.is_none() {
            self.forces();
        }
        let Self { traj, forces, work, .. } = self;
        get_or_compute(work, || {
            let ft = forces.as_ref().cloned().unwrap_or_default();
            WorkSeries {
                linear: linear_work(&traj.fil_pos, &ft),
                rotational: rotational_work(&traj.fil_orient, &ft),
            }
        })
    }

    /// Per-frame crosslinker extension lists, computed once.
    pub fn stretches(&mut self) -> &Vec<Vec<f64>> {
        let Self { traj, stretches, .. } = self;
        get_or_compute(stretches, || stretch_series(traj))
    }

    /// Filament center separation `r_j - r_i` per frame.
    #[must_use]
    pub fn fil_separation(&self) -> TimeSeries<Vec3> {
        self.traj.fil_pos.iter().map(|&[r_i, r_j]| r_j - r_i).collect()
    }

    /// Inter-filament angle `arccos(u_i · u_j)` per frame.
    #[must_use]
    pub fn fil_angle(&self) -> TimeSeries<f64> {
        self.traj
            .fil_orient
            .iter()
            .map(|&[u_i, u_j]| u_i.dot(&u_j).clamp(-1.0, 1.0).acos())
            .collect()
    }

    /// Optical-trap force series, when the assay has a trap.
    #[must_use]
    pub fn trap_force(&self) -> Option<TrapForce> {
        let trap = self.traj.trap.as_ref()?;
        let k_trap = self.params.trap()?.k_spring;
        Some(TrapForce { time: trap.time.clone(), force: trap_force(trap, k_trap) })
    }

    /// Run every analysis and assemble the seed's result.
    pub fn into_result(mut self) -> Result<SeedResult> {
        let n_spec = self.params.n_spec()?;
        let n_steps = self.traj.header.n_steps;
        let half_length = self.traj.lengths[0] * 0.5;

        let forces = self.forces().clone();
        let work = self.work().clone();
        let stretch = stretch_distr(self.stretches());
        let trap = self.trap_force();

        let bound = &self.traj.bound;
        Ok(SeedResult {
            seed: self.params.seed,
            time: self.traj.time.clone(),
            zeroth_moment: zeroth_moment(bound),
            first_moments: first_moments(bound),
            second_moments: second_moments(bound),
            singly_bound_number: singly_bound_number(bound),
            singly_bound_distr: singly_bound_distr(bound, half_length, n_spec, n_steps),
            doubly_bound_distr: doubly_bound_distr(bound, half_length, n_spec, n_steps, DBL_EDGES),
            stretch_distr: stretch,
            forces: forces.force,
            torques: forces.torque,
            linear_work: work.linear,
            rotational_work: work.rotational,
            fil_separation: self.fil_separation(),
            fil_angle: self.fil_angle(),
            trap_force: trap,
            params: self.params,
        })
    }
}

/// Decode-free entry point: analyze an already-decoded trajectory.
pub fn analyze_seed(traj: SeedTrajectory, params: SimParams) -> Result<SeedResult> {
    SeedAnalyzer::new(traj, params)?.into_result()
}
