//! Whole-seed decoding: all streams of one run, frame-aligned.
//!
//! Reads the crosslink and filament streams (strict) plus the optional
//! optical-trap stream (truncatable), re-orders frame-local records into
//! stable global slots via `mesh_id`/`attach_id`, and re-centers lambda
//! offsets so 0 is the filament midpoint. Re-centering happens here, not
//! in the analyzer, because it depends only on static configuration.

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

use crate::classify::{classify_frame, BoundLambdas, ClassifyStats};
use crate::reader::{read_trajectory, EofPolicy};
use anyhow::{bail, ensure, Context, Result};
use std::path::Path;
use tracing::{debug, info};
use trajan_core::config::SimParams;
use trajan_core::error::DecodeError;
use trajan_core::schema::RecordKind;
use trajan_core::types::{
    CrosslinkRecord, FilamentRecord, Header, OpticalTrapRecord, Vec3, FIL_SLOTS,
};

/// Optical-trap series for one seed; may be shorter than the seed's frame
/// count when the producer truncated the stream.
#[derive(Clone, Debug, PartialEq)]
pub struct TrapSeries {
    /// Time axis of the trap stream.
    pub time: Vec<f64>,
    /// Trap center position per frame (first trap slot).
    pub trap_pos: Vec<Vec3>,
    /// Bead position per frame (first trap slot).
    pub bead_pos: Vec<Vec3>,
}

/// One fully decoded seed: every stream, frame-aligned and slot-stable.
#[derive(Clone, Debug, PartialEq)]
pub struct SeedTrajectory {
    /// Header shared by the crosslink and filament streams.
    pub header: Header,
    /// Time axis, `time[i] = i * n_posit * delta`.
    pub time: Vec<f64>,
    /// Filament lengths by global slot, captured from the first frame.
    pub lengths: [f64; FIL_SLOTS],
    /// Classified, re-centered bound-head lists per frame.
    pub bound: Vec<BoundLambdas>,
    /// Filament center positions per frame, by global slot.
    pub fil_pos: Vec<[Vec3; FIL_SLOTS]>,
    /// Filament orientations per frame, by global slot.
    pub fil_orient: Vec<[Vec3; FIL_SLOTS]>,
    /// Optical-trap series, when the assay has one.
    pub trap: Option<TrapSeries>,
    /// Classifier discard counters for the whole stream.
    pub classify_stats: ClassifyStats,
}

impl SeedTrajectory {
    /// Number of frames in the aligned crosslink/filament series.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.time.len()
    }

    /// Decode every stream of one seed from `dir` using the conventional
    /// file names derived from `params.run_name`.
    pub fn decode(dir: &Path, params: &SimParams) -> Result<Self> {
        let xl_path = dir.join(params.crosslink_file()?);
        let fil_path = dir.join(params.filament_file()?);

        let (xl_header, xl_frames) =
            read_trajectory::<CrosslinkRecord, _>(&xl_path, EofPolicy::Strict)
                .with_context(|| format!("decoding {}", xl_path.display()))?;
        let (fil_header, fil_frames) =
            read_trajectory::<FilamentRecord, _>(&fil_path, EofPolicy::Strict)
                .with_context(|| format!("decoding {}", fil_path.display()))?;

        ensure!(
            xl_header.frame_count() == fil_header.frame_count(),
            "crosslink and filament streams disagree on frame count ({} vs {})",
            xl_header.frame_count(),
            fil_header.frame_count()
        );

        let half_length = params.half_length()?;
        let id_offset = params.anchor_id_offset;

        // Classify each crosslink frame, then re-center so 0 is the
        // filament midpoint.
        let mut stats = ClassifyStats::default();
        let mut bound = Vec::with_capacity(xl_frames.len());
        for frame in &xl_frames {
            let mut b = classify_frame(frame, id_offset, &mut stats);
            b.shift(-half_length);
            bound.push(b);
        }
        if stats.total() > 0 {
            info!(
                same_filament = stats.same_filament,
                unattached = stats.unattached_doubly,
                out_of_range = stats.out_of_range,
                "discarded inconsistent crosslink records"
            );
        }

        let (lengths, fil_pos, fil_orient) = order_filaments(&fil_frames)?;

        // Optical-trap stream is optional and may truncate early.
        let trap = match params.trap_file() {
            Some(name) => {
                let path = dir.join(name);
                if path.exists() {
                    Some(decode_trap(&path)?)
                } else {
                    debug!(path = %path.display(), "no optical-trap stream for this seed");
                    None
                }
            }
            None => None,
        };

        let time = xl_header.time_axis(xl_frames.len());
        Ok(Self {
            header: xl_header,
            time,
            lengths,
            bound,
            fil_pos,
            fil_orient,
            trap,
            classify_stats: stats,
        })
    }
}

type OrderedFilaments = ([f64; FIL_SLOTS], Vec<[Vec3; FIL_SLOTS]>, Vec<[Vec3; FIL_SLOTS]>);

/// Re-order frame-local filament records into constant global slots.
fn order_filaments(frames: &[Vec<FilamentRecord>]) -> Result<OrderedFilaments, DecodeError> {
    let mut lengths = [0.0; FIL_SLOTS];
    let mut pos = Vec::with_capacity(frames.len());
    let mut orient = Vec::with_capacity(frames.len());

    for (i, frame) in frames.iter().enumerate() {
        if frame.len() != FIL_SLOTS {
            return Err(DecodeError::MalformedRecord {
                kind: RecordKind::Filament,
                detail: format!("frame {i} holds {} filaments, expected {FIL_SLOTS}", frame.len()),
            });
        }
        let mut p = [Vec3::ZERO; FIL_SLOTS];
        let mut u = [Vec3::ZERO; FIL_SLOTS];
        let mut seen = [false; FIL_SLOTS];
        for fil in frame {
            let idx = fil.mesh_id - 1;
            if !(0..FIL_SLOTS as i32).contains(&idx) {
                return Err(DecodeError::MalformedRecord {
                    kind: RecordKind::Filament,
                    detail: format!("frame {i}: mesh_id {} outside slot range", fil.mesh_id),
                });
            }
            let idx = idx as usize;
            if seen[idx] {
                return Err(DecodeError::MalformedRecord {
                    kind: RecordKind::Filament,
                    detail: format!("frame {i}: duplicate mesh_id {}", fil.mesh_id),
                });
            }
            seen[idx] = true;
            p[idx] = fil.pos;
            u[idx] = fil.orient;
            if i == 0 {
                lengths[idx] = fil.length;
            }
        }
        pos.push(p);
        orient.push(u);
    }

    Ok((lengths, pos, orient))
}

/// Decode an optical-trap stream into its first-slot series.
fn decode_trap(path: &Path) -> Result<TrapSeries> {
    let (header, frames) = read_trajectory::<OpticalTrapRecord, _>(path, EofPolicy::Truncatable)
        .with_context(|| format!("decoding {}", path.display()))?;

    let mut trap_pos = Vec::with_capacity(frames.len());
    let mut bead_pos = Vec::with_capacity(frames.len());
    for (i, frame) in frames.iter().enumerate() {
        // Slot-stable pick: lowest attach_id is the first trap.
        let Some(first) = frame.iter().min_by_key(|t| t.attach_id) else {
            bail!("optical-trap frame {i} in {} holds no records", path.display());
        };
        trap_pos.push(first.pos);
        bead_pos.push(first.bead_pos);
    }

    let time = header.time_axis(frames.len());
    Ok(TrapSeries { time, trap_pos, bead_pos })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filament_slots_follow_mesh_id_not_read_order() {
        let rec = |mesh_id: i32, x: f64| FilamentRecord {
            pos: Vec3::new(x, 0.0, 0.0),
            spos: Vec3::ZERO,
            orient: Vec3::new(0.0, 0.0, 1.0),
            diameter: 1.0,
            length: 10.0,
            mesh_id,
        };
        // Frame 0 in order (1, 2); frame 1 swapped (2, 1).
        let frames = vec![vec![rec(1, 0.0), rec(2, 5.0)], vec![rec(2, 6.0), rec(1, 1.0)]];
        let (lengths, pos, _orient) = order_filaments(&frames).unwrap();
        assert_eq!(lengths, [10.0, 10.0]);
        assert_eq!(pos[1][0].x, 1.0);
        assert_eq!(pos[1][1].x, 6.0);
    }

    #[test]
    fn duplicate_mesh_id_is_malformed() {
        let rec = |mesh_id: i32| FilamentRecord {
            pos: Vec3::ZERO,
            spos: Vec3::ZERO,
            orient: Vec3::ZERO,
            diameter: 1.0,
            length: 10.0,
            mesh_id,
        };
        let frames = vec![vec![rec(1), rec(1)]];
        assert!(order_filaments(&frames).is_err());
    }
}
