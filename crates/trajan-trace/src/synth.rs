//! Synthetic seed generator used by tests and the CLI `simulate` command.
//!
//! Produces binary crosslink/filament/optical-trap files with the exact
//! wire layout the decoder consumes, plus the JSON parameter file, so a
//! whole decode→analyze→aggregate pipeline can run without a simulation.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]

use anyhow::{Context, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use rand::{rngs::StdRng, Rng as _, SeedableRng};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use trajan_core::config::{write_params, SimParams};
use trajan_core::schema::RecordLayout;
use trajan_core::types::{
    AnchorRecord, CrosslinkRecord, FilamentRecord, Header, OpticalTrapRecord, Vec3,
};

/// Shape of the synthetic run.
#[derive(Clone, Copy, Debug)]
pub struct SynthSpec {
    /// Total simulation steps.
    pub n_steps: i32,
    /// Record stride (a frame every `n_posit` steps).
    pub n_posit: i32,
    /// Simulation time step.
    pub delta: f64,
    /// Crosslinker records per frame.
    pub n_xlinks: usize,
    /// Number of optical-trap frames to emit; fewer than the header's
    /// frame count models the producer truncating on early termination.
    pub trap_frames: Option<usize>,
}

impl Default for SynthSpec {
    fn default() -> Self {
        Self { n_steps: 100, n_posit: 10, delta: 0.01, n_xlinks: 8, trap_frames: None }
    }
}

/// Draw a unit vector near `u` (small random tilt, renormalized).
fn wobble(rng: &mut StdRng, u: Vec3, amount: f64) -> Vec3 {
    let n = Vec3::new(
        rng.random_range(-1.0..1.0) * amount,
        rng.random_range(-1.0..1.0) * amount,
        rng.random_range(-1.0..1.0) * amount,
    );
    (u + n).normalized()
}

/// Write one count-prefixed frame of records.
fn write_frame<T: RecordLayout, W: Write>(w: &mut W, records: &[T]) -> Result<()> {
    w.write_i32::<LittleEndian>(records.len() as i32)?;
    for r in records {
        r.write_to(w)?;
    }
    Ok(())
}

/// Generate one seed's parameter file and binary data files under `dir`.
///
/// The generator is deterministic in `params.seed`, so sibling seeds of a
/// scan differ while reruns reproduce byte-identical files.
pub fn generate_seed_files(dir: &Path, params: &SimParams, spec: &SynthSpec) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    write_params(dir.join(params.params_file()), params)?;

    let mut rng = StdRng::seed_from_u64(params.seed);
    let header = Header { n_steps: spec.n_steps, n_posit: spec.n_posit, delta: spec.delta };
    let nframes = header.frame_count();

    let length = params.filament()?.length;
    let id_offset = params.anchor_id_offset;

    // Filament geometry drifts slowly so work integrals are nonzero.
    let mut fil_pos = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)];
    let mut fil_orient = [Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)];

    let fil_path = dir.join(params.filament_file()?);
    let xl_path = dir.join(params.crosslink_file()?);

    let f = File::create(&fil_path).with_context(|| format!("create {}", fil_path.display()))?;
    let mut fw = BufWriter::new(f);
    let f = File::create(&xl_path).with_context(|| format!("create {}", xl_path.display()))?;
    let mut xw = BufWriter::new(f);

    header.write_to(&mut fw)?;
    header.write_to(&mut xw)?;

    for frame in 0..nframes {
        for slot in 0..2 {
            fil_pos[slot] += Vec3::new(
                rng.random_range(-1.0..1.0) * 0.05,
                rng.random_range(-1.0..1.0) * 0.05,
                0.0,
            );
            fil_orient[slot] = wobble(&mut rng, fil_orient[slot], 0.05);
        }

        // Emit in swapped order on odd frames: readers must re-order by
        // mesh_id, not trust read order.
        let recs: Vec<FilamentRecord> = {
            let mk = |slot: usize| FilamentRecord {
                pos: fil_pos[slot],
                spos: fil_pos[slot],
                orient: fil_orient[slot],
                diameter: 1.0,
                length,
                mesh_id: slot as i32 + 1,
            };
            if frame % 2 == 0 {
                vec![mk(0), mk(1)]
            } else {
                vec![mk(1), mk(0)]
            }
        };
        write_frame(&mut fw, &recs)?;

        let xls: Vec<CrosslinkRecord> = (0..spec.n_xlinks)
            .map(|_| random_crosslink(&mut rng, length, id_offset))
            .collect();
        write_frame(&mut xw, &xls)?;
    }
    fw.flush()?;
    xw.flush()?;

    if let Some(trap_name) = params.trap_file() {
        let trap_path = dir.join(trap_name);
        let f = File::create(&trap_path)
            .with_context(|| format!("create {}", trap_path.display()))?;
        let mut tw = BufWriter::new(f);
        header.write_to(&mut tw)?;

        let emit = spec.trap_frames.unwrap_or(nframes).min(nframes);
        let trap_center = Vec3::new(length * 0.5 + 1.0, 0.0, 0.0);
        for _ in 0..emit {
            let bead = trap_center
                + Vec3::new(
                    rng.random_range(-1.0..1.0) * 0.1,
                    rng.random_range(-1.0..1.0) * 0.1,
                    0.0,
                );
            let rec = OpticalTrapRecord {
                pos: trap_center,
                spos: trap_center,
                orient: Vec3::new(1.0, 0.0, 0.0),
                diameter: 1.0,
                length: 0.0,
                bead_pos: bead,
                bead_spos: bead,
                attach_id: 1,
            };
            write_frame(&mut tw, std::slice::from_ref(&rec))?;
        }
        tw.flush()?;
    }

    Ok(())
}

fn random_anchor(rng: &mut StdRng, bound: bool, lambda: f64, attached_id: i32) -> AnchorRecord {
    AnchorRecord {
        bound,
        active: true,
        is_static: false,
        pos: Vec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        ),
        orient: Vec3::new(0.0, 0.0, 1.0),
        lambda,
        attached_id,
    }
}

fn random_crosslink(rng: &mut StdRng, length: f64, id_offset: i32) -> CrosslinkRecord {
    let state = rng.random_range(0..10);
    let (doubly, anchors) = if state < 4 {
        // Doubly bound: one head per filament, producer numbering.
        let l0 = rng.random_range(0.0..length);
        let l1 = rng.random_range(0.0..length);
        (
            true,
            [
                random_anchor(rng, true, l0, id_offset),
                random_anchor(rng, true, l1, id_offset + 1),
            ],
        )
    } else if state < 7 {
        let l0 = rng.random_range(0.0..length);
        let fil = rng.random_range(0..2);
        (
            false,
            [
                random_anchor(rng, true, l0, id_offset + fil),
                random_anchor(rng, false, 0.0, -1),
            ],
        )
    } else {
        (
            false,
            [random_anchor(rng, false, 0.0, -1), random_anchor(rng, false, 0.0, -1)],
        )
    };

    CrosslinkRecord {
        doubly,
        diameter: 0.5,
        length: 1.0,
        pos: Vec3::ZERO,
        orient: Vec3::new(0.0, 0.0, 1.0),
        anchors,
    }
}
