//! Streaming reader for count-prefixed binary trajectory files.
//!
//! A trajectory file is a 16-byte header followed by frames; each frame is
//! an `i32` record count and exactly that many fixed-size records of the
//! stream's format. Frame byte offsets depend on every previous frame's
//! count, so decoding is strictly sequential.

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

use byteorder::{ByteOrder, LittleEndian};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;
use trajan_core::error::DecodeError;
use trajan_core::schema::{RecordKind, RecordLayout, HEADER_SIZE};
use trajan_core::types::Header;

/// What an end-of-stream inside a frame means for a given format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EofPolicy {
    /// Incomplete frames and missing frames are hard decode errors
    /// (crosslink and filament streams).
    Strict,
    /// Early end-of-stream after any number of complete frames is a normal
    /// terminal condition; a trailing partial frame is dropped
    /// (optical-trap streams, whose producer may truncate on early exit).
    Truncatable,
}

impl EofPolicy {
    /// The policy each stream format carries.
    #[inline]
    #[must_use]
    pub const fn for_kind(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Crosslink | RecordKind::Filament => Self::Strict,
            RecordKind::OpticalTrap => Self::Truncatable,
        }
    }
}

/// Read until `buf` is full or the stream ends; returns bytes read.
fn fill<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut n = 0;
    while n < buf.len() {
        match r.read(&mut buf[n..]) {
            Ok(0) => break,
            Ok(k) => n += k,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(n)
}

/// Sequential decoder for one trajectory file of record type `T`.
#[derive(Debug)]
pub struct TrajectoryReader<T, R> {
    inner: R,
    frame: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: RecordLayout> TrajectoryReader<T, BufReader<File>> {
    /// Open a trajectory file for buffered sequential decoding.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DecodeError> {
        let f = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::new(f)))
    }
}

impl<T: RecordLayout, R: Read> TrajectoryReader<T, R> {
    /// Wrap an already-open byte stream.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self { inner, frame: 0, _marker: PhantomData }
    }

    /// Read the 16-byte stream header. Call once, before any frame.
    pub fn read_header(&mut self) -> Result<Header, DecodeError> {
        let mut buf = [0u8; HEADER_SIZE];
        let got = fill(&mut self.inner, &mut buf)?;
        if got < HEADER_SIZE {
            return Err(DecodeError::MalformedRecord {
                kind: T::KIND,
                detail: format!("stream too short for header ({got} of {HEADER_SIZE} bytes)"),
            });
        }
        let header = Header {
            n_steps: LittleEndian::read_i32(&buf[0..4]),
            n_posit: LittleEndian::read_i32(&buf[4..8]),
            delta: LittleEndian::read_f64(&buf[8..16]),
        };
        if header.n_posit <= 0 {
            return Err(DecodeError::MalformedRecord {
                kind: T::KIND,
                detail: format!("non-positive record stride {}", header.n_posit),
            });
        }
        Ok(header)
    }

    /// Read the next frame, or `None` at a clean end of stream.
    ///
    /// The stream ending after a partial count prefix or inside the record
    /// payload is a [`DecodeError::ShortRead`]; the caller decides whether
    /// that is fatal (see [`EofPolicy`]).
    pub fn read_frame(&mut self) -> Result<Option<Vec<T>>, DecodeError> {
        let mut prefix = [0u8; 4];
        let got = fill(&mut self.inner, &mut prefix)?;
        if got == 0 {
            return Ok(None);
        }
        if got < prefix.len() {
            return Err(DecodeError::ShortRead {
                kind: T::KIND,
                frame: self.frame,
                detail: format!("frame count prefix truncated ({got} of 4 bytes)"),
            });
        }
        let n = LittleEndian::read_i32(&prefix);
        if n < 0 {
            return Err(DecodeError::MalformedRecord {
                kind: T::KIND,
                detail: format!("negative record count {n} in frame {}", self.frame),
            });
        }
        let n = n as usize;

        let mut records = Vec::with_capacity(n);
        let mut buf = vec![0u8; T::SIZE];
        for i in 0..n {
            let got = fill(&mut self.inner, &mut buf)?;
            if got < T::SIZE {
                return Err(DecodeError::ShortRead {
                    kind: T::KIND,
                    frame: self.frame,
                    detail: format!(
                        "record {} of {n} truncated ({got} of {} bytes)",
                        i + 1,
                        T::SIZE
                    ),
                });
            }
            let rec = T::read_from(&mut buf.as_slice()).map_err(|e| {
                DecodeError::MalformedRecord {
                    kind: T::KIND,
                    detail: format!("record {} of {n} in frame {}: {e}", i + 1, self.frame),
                }
            })?;
            records.push(rec);
        }
        self.frame += 1;
        Ok(Some(records))
    }

    /// Number of complete frames decoded so far.
    #[inline]
    #[must_use]
    pub const fn frames_read(&self) -> usize {
        self.frame
    }
}

/// Decode a whole trajectory file: header plus all frames under `policy`.
///
/// `Strict` requires exactly `header.frame_count()` frames; `Truncatable`
/// accepts fewer (a trailing partial frame is discarded, every complete
/// frame stays valid).
pub fn read_trajectory<T, P>(path: P, policy: EofPolicy) -> Result<(Header, Vec<Vec<T>>), DecodeError>
where
    T: RecordLayout,
    P: AsRef<Path>,
{
    let mut rdr = TrajectoryReader::<T, _>::open(path)?;
    let header = rdr.read_header()?;
    let expected = header.frame_count();

    let mut frames = Vec::with_capacity(expected);
    loop {
        match rdr.read_frame() {
            Ok(Some(f)) => frames.push(f),
            Ok(None) => break,
            Err(e) if policy == EofPolicy::Truncatable && e.is_short_read() => {
                let kind = T::KIND;
                tracing::debug!(
                    %kind,
                    frames = frames.len(),
                    "stream truncated mid-frame; keeping complete frames"
                );
                break;
            }
            Err(e) => return Err(e),
        }
    }

    if policy == EofPolicy::Strict && frames.len() != expected {
        return Err(DecodeError::ShortRead {
            kind: T::KIND,
            frame: frames.len(),
            detail: format!("stream ended after {} of {expected} expected frames", frames.len()),
        });
    }
    if frames.len() > expected {
        let kind = T::KIND;
        tracing::warn!(
            %kind,
            expected,
            got = frames.len(),
            "stream carries more frames than its header declares"
        );
    }
    Ok((header, frames))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trajan_core::schema::RecordLayout as _;
    use trajan_core::types::{FilamentRecord, OpticalTrapRecord, Vec3};

    fn fil(mesh_id: i32) -> FilamentRecord {
        FilamentRecord {
            pos: Vec3::new(0.0, 0.0, 0.0),
            spos: Vec3::ZERO,
            orient: Vec3::new(0.0, 0.0, 1.0),
            diameter: 1.0,
            length: 10.0,
            mesh_id,
        }
    }

    fn trap(attach_id: i32) -> OpticalTrapRecord {
        OpticalTrapRecord {
            pos: Vec3::new(1.0, 0.0, 0.0),
            spos: Vec3::ZERO,
            orient: Vec3::new(1.0, 0.0, 0.0),
            diameter: 1.0,
            length: 0.0,
            bead_pos: Vec3::new(1.1, 0.0, 0.0),
            bead_spos: Vec3::ZERO,
            attach_id,
        }
    }

    fn stream_bytes<T: RecordLayout>(header: Header, frames: &[Vec<T>]) -> Vec<u8> {
        let mut buf = Vec::new();
        header.write_to(&mut buf).unwrap();
        for f in frames {
            buf.extend_from_slice(&(f.len() as i32).to_le_bytes());
            for r in f {
                r.write_to(&mut buf).unwrap();
            }
        }
        buf
    }

    #[test]
    fn decodes_exactly_declared_frames() {
        let header = Header { n_steps: 30, n_posit: 10, delta: 0.1 };
        let frames = vec![vec![fil(1), fil(2)]; 3];
        let bytes = stream_bytes(header, &frames);

        let mut rdr = TrajectoryReader::<FilamentRecord, _>::new(bytes.as_slice());
        let h = rdr.read_header().unwrap();
        assert_eq!(h.frame_count(), 3);
        let mut n = 0;
        while let Some(f) = rdr.read_frame().unwrap() {
            assert_eq!(f.len(), 2);
            n += 1;
        }
        assert_eq!(n, 3);
    }

    #[test]
    fn empty_frames_are_valid() {
        let header = Header { n_steps: 20, n_posit: 10, delta: 0.1 };
        let frames: Vec<Vec<FilamentRecord>> = vec![vec![], vec![fil(1)]];
        let bytes = stream_bytes(header, &frames);

        let mut rdr = TrajectoryReader::<FilamentRecord, _>::new(bytes.as_slice());
        rdr.read_header().unwrap();
        assert_eq!(rdr.read_frame().unwrap().unwrap().len(), 0);
        assert_eq!(rdr.read_frame().unwrap().unwrap().len(), 1);
        assert!(rdr.read_frame().unwrap().is_none());
    }

    #[test]
    fn partial_record_is_a_short_read() {
        let header = Header { n_steps: 10, n_posit: 10, delta: 0.1 };
        let frames = vec![vec![fil(1), fil(2)]];
        let mut bytes = stream_bytes(header, &frames);
        bytes.truncate(bytes.len() - 10);

        let mut rdr = TrajectoryReader::<FilamentRecord, _>::new(bytes.as_slice());
        rdr.read_header().unwrap();
        let err = rdr.read_frame().unwrap_err();
        assert!(err.is_short_read(), "got {err}");
    }

    #[test]
    fn partial_count_prefix_is_a_short_read() {
        let header = Header { n_steps: 10, n_posit: 10, delta: 0.1 };
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        bytes.extend_from_slice(&[1, 0]); // half a prefix

        let mut rdr = TrajectoryReader::<FilamentRecord, _>::new(bytes.as_slice());
        rdr.read_header().unwrap();
        assert!(rdr.read_frame().unwrap_err().is_short_read());
    }

    #[test]
    fn negative_count_is_malformed() {
        let header = Header { n_steps: 10, n_posit: 10, delta: 0.1 };
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        bytes.extend_from_slice(&(-3i32).to_le_bytes());

        let mut rdr = TrajectoryReader::<FilamentRecord, _>::new(bytes.as_slice());
        rdr.read_header().unwrap();
        let err = rdr.read_frame().unwrap_err();
        assert!(matches!(err, DecodeError::MalformedRecord { .. }));
    }

    #[test]
    fn zero_stride_header_is_malformed() {
        let header = Header { n_steps: 10, n_posit: 0, delta: 0.1 };
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        let mut rdr = TrajectoryReader::<FilamentRecord, _>::new(bytes.as_slice());
        assert!(matches!(
            rdr.read_header().unwrap_err(),
            DecodeError::MalformedRecord { .. }
        ));
    }

    #[test]
    fn strict_policy_requires_declared_frame_count() {
        let header = Header { n_steps: 30, n_posit: 10, delta: 0.1 };
        let frames = vec![vec![fil(1), fil(2)]; 2]; // header promises 3
        let bytes = stream_bytes(header, &frames);

        let dir = std::env::temp_dir().join(format!(
            "trajan_strict_{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("fil.posit");
        std::fs::write(&path, &bytes).unwrap();

        let err = read_trajectory::<FilamentRecord, _>(&path, EofPolicy::Strict).unwrap_err();
        assert!(err.is_short_read());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn truncatable_policy_keeps_complete_frames() {
        let header = Header { n_steps: 40, n_posit: 10, delta: 0.1 };
        let frames = vec![vec![trap(1)]; 4];
        let mut bytes = stream_bytes(header, &frames);
        // Chop the last frame in half: 2 complete frames + 1 partial.
        bytes.truncate(16 + 2 * (4 + OpticalTrapRecord::SIZE) + 4 + 20);

        let dir = std::env::temp_dir().join(format!(
            "trajan_trunc_{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ot.posit");
        std::fs::write(&path, &bytes).unwrap();

        let (h, got) =
            read_trajectory::<OpticalTrapRecord, _>(&path, EofPolicy::Truncatable).unwrap();
        assert_eq!(h.frame_count(), 4);
        assert_eq!(got.len(), 2);
        let _ = std::fs::remove_dir_all(dir);
    }
}
