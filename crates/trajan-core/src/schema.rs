//! Fixed binary layouts for the trajectory wire format.
//!
//! All records are packed little-endian with no padding; `bool` fields are
//! exactly one byte (nonzero ⇒ true). Each record type knows its byte size
//! and how to read/write itself, so the decoder can stream any format
//! through one frame loop parameterized by the layout (see
//! `trajan-trace`). Byte sizes are compile-time constants validated by the
//! round-trip tests at the bottom of this file.

use crate::types::{
    AnchorRecord, CrosslinkRecord, FilamentRecord, Header, OpticalTrapRecord, Vec3,
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Result as IoResult, Write};

/// Header byte size: `i32` + `i32` + `f64`.
pub const HEADER_SIZE: usize = 16;
/// Anchor byte size: 3 bools + 2 vec3 + `f64` + `i32`.
pub const ANCHOR_SIZE: usize = 3 + 48 + 8 + 4;
/// Crosslink byte size: 1 bool + 2 `f64` + 2 vec3 + 2 anchors.
pub const CROSSLINK_SIZE: usize = 1 + 16 + 48 + 2 * ANCHOR_SIZE;
/// Filament byte size: 3 vec3 + 2 `f64` + `i32`.
pub const FILAMENT_SIZE: usize = 72 + 16 + 4;
/// Optical-trap byte size: 5 vec3 + 2 `f64` + `i32`.
pub const OPTICAL_TRAP_SIZE: usize = 120 + 16 + 4;

/// Tag for the three frame formats sharing the header + count-prefix shape.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Crosslinker stream (`.spec` files).
    Crosslink,
    /// Rigid-filament stream (`.posit` files).
    Filament,
    /// Optical-trap stream (may truncate early).
    OpticalTrap,
}

impl RecordKind {
    /// Fixed record byte size for this format.
    #[inline]
    #[must_use]
    pub const fn record_size(self) -> usize {
        match self {
            Self::Crosslink => CROSSLINK_SIZE,
            Self::Filament => FILAMENT_SIZE,
            Self::OpticalTrap => OPTICAL_TRAP_SIZE,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crosslink => f.write_str("crosslink"),
            Self::Filament => f.write_str("filament"),
            Self::OpticalTrap => f.write_str("optical-trap"),
        }
    }
}

/// A fixed-size record that can be moved across the wire.
///
/// `read_from` consumes exactly [`RecordLayout::SIZE`] bytes on success;
/// `write_to` produces exactly that many.
pub trait RecordLayout: Sized {
    /// Which stream format this record belongs to.
    const KIND: RecordKind;
    /// Exact packed byte size.
    const SIZE: usize;

    /// Decode one record from the reader.
    fn read_from<R: Read>(r: &mut R) -> IoResult<Self>;

    /// Encode one record to the writer.
    fn write_to<W: Write>(&self, w: &mut W) -> IoResult<()>;
}

/* ---------------- primitive helpers ---------------- */

#[inline]
fn read_bool<R: Read>(r: &mut R) -> IoResult<bool> {
    Ok(r.read_u8()? != 0)
}

#[inline]
fn write_bool<W: Write>(w: &mut W, v: bool) -> IoResult<()> {
    w.write_u8(u8::from(v))
}

#[inline]
fn read_vec3<R: Read>(r: &mut R) -> IoResult<Vec3> {
    Ok(Vec3::new(
        r.read_f64::<LittleEndian>()?,
        r.read_f64::<LittleEndian>()?,
        r.read_f64::<LittleEndian>()?,
    ))
}

#[inline]
fn write_vec3<W: Write>(w: &mut W, v: &Vec3) -> IoResult<()> {
    w.write_f64::<LittleEndian>(v.x)?;
    w.write_f64::<LittleEndian>(v.y)?;
    w.write_f64::<LittleEndian>(v.z)
}

/* ---------------- header ---------------- */

impl Header {
    /// Decode the 16-byte stream header.
    pub fn read_from<R: Read>(r: &mut R) -> IoResult<Self> {
        Ok(Self {
            n_steps: r.read_i32::<LittleEndian>()?,
            n_posit: r.read_i32::<LittleEndian>()?,
            delta: r.read_f64::<LittleEndian>()?,
        })
    }

    /// Encode the 16-byte stream header.
    pub fn write_to<W: Write>(&self, w: &mut W) -> IoResult<()> {
        w.write_i32::<LittleEndian>(self.n_steps)?;
        w.write_i32::<LittleEndian>(self.n_posit)?;
        w.write_f64::<LittleEndian>(self.delta)
    }
}

/* ---------------- records ---------------- */

impl AnchorRecord {
    fn read_from<R: Read>(r: &mut R) -> IoResult<Self> {
        Ok(Self {
            bound: read_bool(r)?,
            active: read_bool(r)?,
            is_static: read_bool(r)?,
            pos: read_vec3(r)?,
            orient: read_vec3(r)?,
            lambda: r.read_f64::<LittleEndian>()?,
            attached_id: r.read_i32::<LittleEndian>()?,
        })
    }

    fn write_to<W: Write>(&self, w: &mut W) -> IoResult<()> {
        write_bool(w, self.bound)?;
        write_bool(w, self.active)?;
        write_bool(w, self.is_static)?;
        write_vec3(w, &self.pos)?;
        write_vec3(w, &self.orient)?;
        w.write_f64::<LittleEndian>(self.lambda)?;
        w.write_i32::<LittleEndian>(self.attached_id)
    }
}

impl RecordLayout for CrosslinkRecord {
    const KIND: RecordKind = RecordKind::Crosslink;
    const SIZE: usize = CROSSLINK_SIZE;

    fn read_from<R: Read>(r: &mut R) -> IoResult<Self> {
        Ok(Self {
            doubly: read_bool(r)?,
            diameter: r.read_f64::<LittleEndian>()?,
            length: r.read_f64::<LittleEndian>()?,
            pos: read_vec3(r)?,
            orient: read_vec3(r)?,
            anchors: [AnchorRecord::read_from(r)?, AnchorRecord::read_from(r)?],
        })
    }

    fn write_to<W: Write>(&self, w: &mut W) -> IoResult<()> {
        write_bool(w, self.doubly)?;
        w.write_f64::<LittleEndian>(self.diameter)?;
        w.write_f64::<LittleEndian>(self.length)?;
        write_vec3(w, &self.pos)?;
        write_vec3(w, &self.orient)?;
        self.anchors[0].write_to(w)?;
        self.anchors[1].write_to(w)
    }
}

impl RecordLayout for FilamentRecord {
    const KIND: RecordKind = RecordKind::Filament;
    const SIZE: usize = FILAMENT_SIZE;

    fn read_from<R: Read>(r: &mut R) -> IoResult<Self> {
        Ok(Self {
            pos: read_vec3(r)?,
            spos: read_vec3(r)?,
            orient: read_vec3(r)?,
            diameter: r.read_f64::<LittleEndian>()?,
            length: r.read_f64::<LittleEndian>()?,
            mesh_id: r.read_i32::<LittleEndian>()?,
        })
    }

    fn write_to<W: Write>(&self, w: &mut W) -> IoResult<()> {
        write_vec3(w, &self.pos)?;
        write_vec3(w, &self.spos)?;
        write_vec3(w, &self.orient)?;
        w.write_f64::<LittleEndian>(self.diameter)?;
        w.write_f64::<LittleEndian>(self.length)?;
        w.write_i32::<LittleEndian>(self.mesh_id)
    }
}

impl RecordLayout for OpticalTrapRecord {
    const KIND: RecordKind = RecordKind::OpticalTrap;
    const SIZE: usize = OPTICAL_TRAP_SIZE;

    fn read_from<R: Read>(r: &mut R) -> IoResult<Self> {
        Ok(Self {
            pos: read_vec3(r)?,
            spos: read_vec3(r)?,
            orient: read_vec3(r)?,
            diameter: r.read_f64::<LittleEndian>()?,
            length: r.read_f64::<LittleEndian>()?,
            bead_pos: read_vec3(r)?,
            bead_spos: read_vec3(r)?,
            attach_id: r.read_i32::<LittleEndian>()?,
        })
    }

    fn write_to<W: Write>(&self, w: &mut W) -> IoResult<()> {
        write_vec3(w, &self.pos)?;
        write_vec3(w, &self.spos)?;
        write_vec3(w, &self.orient)?;
        w.write_f64::<LittleEndian>(self.diameter)?;
        w.write_f64::<LittleEndian>(self.length)?;
        write_vec3(w, &self.bead_pos)?;
        write_vec3(w, &self.bead_spos)?;
        w.write_i32::<LittleEndian>(self.attach_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(lambda: f64, attached_id: i32) -> AnchorRecord {
        AnchorRecord {
            bound: true,
            active: true,
            is_static: false,
            pos: Vec3::new(1.0, 2.0, 3.0),
            orient: Vec3::new(0.0, 0.0, 1.0),
            lambda,
            attached_id,
        }
    }

    #[test]
    fn header_round_trip_is_sixteen_bytes() {
        let h = Header { n_steps: 100, n_posit: 10, delta: 0.01 };
        let mut buf = Vec::new();
        h.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), HEADER_SIZE);
        let back = Header::read_from(&mut buf.as_slice()).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn crosslink_round_trip_consumes_exact_size() {
        let xl = CrosslinkRecord {
            doubly: true,
            diameter: 0.5,
            length: 1.0,
            pos: Vec3::new(0.1, 0.2, 0.3),
            orient: Vec3::new(0.0, 1.0, 0.0),
            anchors: [anchor(2.0, 1), anchor(-1.0, 2)],
        };
        let mut buf = Vec::new();
        xl.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), CrosslinkRecord::SIZE);
        let back = CrosslinkRecord::read_from(&mut buf.as_slice()).unwrap();
        assert_eq!(back, xl);
    }

    #[test]
    fn filament_round_trip_consumes_exact_size() {
        let fil = FilamentRecord {
            pos: Vec3::new(1.0, 0.0, 0.0),
            spos: Vec3::ZERO,
            orient: Vec3::new(0.0, 0.0, 1.0),
            diameter: 1.0,
            length: 10.0,
            mesh_id: 2,
        };
        let mut buf = Vec::new();
        fil.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), FilamentRecord::SIZE);
        let back = FilamentRecord::read_from(&mut buf.as_slice()).unwrap();
        assert_eq!(back, fil);
    }

    #[test]
    fn optical_trap_round_trip_consumes_exact_size() {
        let ot = OpticalTrapRecord {
            pos: Vec3::new(1.0, 2.0, 3.0),
            spos: Vec3::ZERO,
            orient: Vec3::new(1.0, 0.0, 0.0),
            diameter: 1.0,
            length: 0.0,
            bead_pos: Vec3::new(1.1, 2.0, 3.0),
            bead_spos: Vec3::ZERO,
            attach_id: 1,
        };
        let mut buf = Vec::new();
        ot.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), OpticalTrapRecord::SIZE);
        let back = OpticalTrapRecord::read_from(&mut buf.as_slice()).unwrap();
        assert_eq!(back, ot);
    }

    #[test]
    fn declared_sizes_match_field_sums() {
        assert_eq!(ANCHOR_SIZE, 63);
        assert_eq!(CROSSLINK_SIZE, 191);
        assert_eq!(FILAMENT_SIZE, 92);
        assert_eq!(OPTICAL_TRAP_SIZE, 140);
    }

    #[test]
    fn truncated_record_is_an_error() {
        let fil = FilamentRecord {
            pos: Vec3::ZERO,
            spos: Vec3::ZERO,
            orient: Vec3::ZERO,
            diameter: 1.0,
            length: 10.0,
            mesh_id: 1,
        };
        let mut buf = Vec::new();
        fil.write_to(&mut buf).unwrap();
        buf.truncate(FilamentRecord::SIZE - 5);
        assert!(FilamentRecord::read_from(&mut buf.as_slice()).is_err());
    }
}
