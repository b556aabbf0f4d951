//! Structured error taxonomy for decode, aggregation and configuration.
//!
//! Decode-time structural errors abort only the affected seed/file.
//! Classifier topology inconsistencies are *warnings* (counted, decode
//! continues) and therefore do not appear here. Aggregation errors abort
//! the whole aggregate operation. All variants convert into
//! [`anyhow::Error`] at operation boundaries via `?`.

use crate::schema::RecordKind;
use thiserror::Error;

/// Errors raised while decoding a binary trajectory stream.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Record or header bytes violate the declared schema.
    #[error("malformed {kind} record: {detail}")]
    MalformedRecord {
        /// Stream format the record belongs to.
        kind: RecordKind,
        /// What the schema check found.
        detail: String,
    },

    /// The stream ended inside a count-prefixed frame.
    ///
    /// Fatal for crosslink/filament streams; optical-trap callers treat it
    /// as normal end-of-stream (all previously decoded frames stay valid).
    #[error("short read in {kind} stream at frame {frame}: {detail}")]
    ShortRead {
        /// Stream format.
        kind: RecordKind,
        /// 0-based index of the frame that could not be completed.
        frame: usize,
        /// What was missing.
        detail: String,
    },

    /// Underlying I/O failure (open, seek, unexpected read error).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Whether this error is the truncation case optical-trap streams
    /// accept as a normal terminal condition.
    #[inline]
    #[must_use]
    pub const fn is_short_read(&self) -> bool {
        matches!(self, Self::ShortRead { .. })
    }
}

/// Errors raised while folding per-seed results into scan statistics.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Seeds disagree on shapes, bin edges or parameter provenance.
    ///
    /// Element-wise statistics over misaligned arrays are meaningless, so
    /// no partial aggregate is produced.
    #[error("aggregation mismatch across seeds: {what}")]
    AggregationMismatch {
        /// Which property disagreed.
        what: String,
    },
}

/// Errors raised when required configuration is absent.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required key was missing from the parameter tree.
    #[error("missing required configuration key: {key}")]
    MissingKey {
        /// Dotted path of the absent key.
        key: String,
    },
}
