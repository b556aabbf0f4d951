//! Binding-state classification of decoded crosslink frames.
//!
//! One pass per frame turns raw crosslink records into per-filament lists
//! of head positions (lambda offsets): singly bound and doubly bound.
//! Topology inconsistencies are logged and counted, never fatal — the
//! record is dropped from binding statistics and decoding continues.

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

use serde::{Deserialize, Serialize};
use trajan_core::types::{CrosslinkRecord, FIL_SLOTS};

/// Per-filament lambda lists for one classified frame.
///
/// Lists are ragged (one entry per bound head, variable per frame) and the
/// two doubly-bound lists stay index-paired: entry `k` of `doubly[0]` and
/// `doubly[1]` belong to the same crosslinker.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct BoundLambdas {
    /// Singly-bound head positions per filament slot.
    pub singly: [Vec<f64>; FIL_SLOTS],
    /// Doubly-bound head positions per filament slot, index-paired.
    pub doubly: [Vec<f64>; FIL_SLOTS],
}

impl BoundLambdas {
    /// Shift every stored lambda by `offset` (midpoint re-centering).
    pub fn shift(&mut self, offset: f64) {
        for list in self.singly.iter_mut().chain(self.doubly.iter_mut()) {
            for lambda in list.iter_mut() {
                *lambda += offset;
            }
        }
    }
}

/// Counts of discarded records per inconsistency class, accumulated over a
/// whole stream and reported once per seed.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassifyStats {
    /// Doubly-bound crosslinkers whose anchors name the same filament.
    pub same_filament: u64,
    /// Doubly-bound crosslinkers with an unattached (negative-id) anchor.
    pub unattached_doubly: u64,
    /// Anchors whose id falls outside the two-filament slot range after
    /// the configured offset is applied.
    pub out_of_range: u64,
}

impl ClassifyStats {
    /// Total discarded records.
    #[inline]
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.same_filament + self.unattached_doubly + self.out_of_range
    }
}

/// Map an anchor id to a filament slot, or `None` if out of range.
#[inline]
fn slot(attached_id: i32, id_offset: i32) -> Option<usize> {
    let idx = attached_id - id_offset;
    (0..FIL_SLOTS as i32).contains(&idx).then_some(idx as usize)
}

/// Classify one decoded crosslink frame into bound-head lists.
///
/// `id_offset` converts the producer's anchor numbering into the 0-based
/// filament slot (historically 1 or 2; it comes from configuration).
pub fn classify_frame(
    records: &[CrosslinkRecord],
    id_offset: i32,
    stats: &mut ClassifyStats,
) -> BoundLambdas {
    let mut out = BoundLambdas::default();

    for xl in records {
        if xl.doubly {
            let [a0, a1] = &xl.anchors;
            if a0.attached_id == a1.attached_id {
                tracing::warn!(id = a0.attached_id, "anchors attached to the same filament");
                stats.same_filament += 1;
                continue;
            }
            if a0.attached_id < 0 || a1.attached_id < 0 {
                tracing::warn!("anchor not attached even though doubly bound");
                stats.unattached_doubly += 1;
                continue;
            }
            match (slot(a0.attached_id, id_offset), slot(a1.attached_id, id_offset)) {
                (Some(s0), Some(s1)) => {
                    out.doubly[s0].push(a0.lambda);
                    out.doubly[s1].push(a1.lambda);
                }
                _ => {
                    tracing::warn!(
                        ids = ?(a0.attached_id, a1.attached_id),
                        id_offset,
                        "anchor id outside filament slot range"
                    );
                    stats.out_of_range += 1;
                }
            }
        } else if xl.anchors[0].bound {
            let a0 = &xl.anchors[0];
            match slot(a0.attached_id, id_offset) {
                Some(s0) => out.singly[s0].push(a0.lambda),
                None => {
                    tracing::warn!(
                        id = a0.attached_id,
                        id_offset,
                        "singly-bound anchor id outside filament slot range"
                    );
                    stats.out_of_range += 1;
                }
            }
        }
        // Fully unbound crosslinkers contribute nothing.
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use trajan_core::types::{AnchorRecord, Vec3};

    fn anchor(bound: bool, lambda: f64, attached_id: i32) -> AnchorRecord {
        AnchorRecord {
            bound,
            active: true,
            is_static: false,
            pos: Vec3::ZERO,
            orient: Vec3::ZERO,
            lambda,
            attached_id,
        }
    }

    fn xl(doubly: bool, a0: AnchorRecord, a1: AnchorRecord) -> CrosslinkRecord {
        CrosslinkRecord {
            doubly,
            diameter: 0.5,
            length: 1.0,
            pos: Vec3::ZERO,
            orient: Vec3::ZERO,
            anchors: [a0, a1],
        }
    }

    #[test]
    fn doubly_bound_heads_land_in_paired_slots() {
        let recs = vec![xl(true, anchor(true, 2.0, 1), anchor(true, -1.0, 2))];
        let mut stats = ClassifyStats::default();
        let out = classify_frame(&recs, 1, &mut stats);
        assert_eq!(out.doubly[0], vec![2.0]);
        assert_eq!(out.doubly[1], vec![-1.0]);
        assert!(out.singly[0].is_empty() && out.singly[1].is_empty());
        assert_eq!(stats.total(), 0);
    }

    #[test]
    fn singly_bound_uses_first_anchor() {
        let recs = vec![xl(false, anchor(true, 3.5, 2), anchor(false, 0.0, -1))];
        let mut stats = ClassifyStats::default();
        let out = classify_frame(&recs, 1, &mut stats);
        assert_eq!(out.singly[1], vec![3.5]);
        assert!(out.doubly[0].is_empty());
    }

    #[test]
    fn unbound_contributes_nothing() {
        let recs = vec![xl(false, anchor(false, 1.0, -1), anchor(false, 2.0, -1))];
        let mut stats = ClassifyStats::default();
        let out = classify_frame(&recs, 1, &mut stats);
        assert_eq!(out, BoundLambdas::default());
    }

    #[test]
    fn same_filament_pair_is_discarded_whole() {
        let recs = vec![
            xl(true, anchor(true, 1.0, 1), anchor(true, 2.0, 1)),
            xl(true, anchor(true, 0.5, 1), anchor(true, -0.5, 2)),
        ];
        let mut stats = ClassifyStats::default();
        let out = classify_frame(&recs, 1, &mut stats);
        assert_eq!(stats.same_filament, 1);
        // Only the consistent pair survives, lists stay index-paired.
        assert_eq!(out.doubly[0].len(), 1);
        assert_eq!(out.doubly[1].len(), 1);
    }

    #[test]
    fn unattached_doubly_is_discarded_whole() {
        let recs = vec![xl(true, anchor(true, 1.0, 1), anchor(false, 2.0, -1))];
        let mut stats = ClassifyStats::default();
        let out = classify_frame(&recs, 1, &mut stats);
        assert_eq!(stats.unattached_doubly, 1);
        assert!(out.doubly[0].is_empty() && out.doubly[1].is_empty());
    }

    #[test]
    fn two_based_offset_remaps_slots() {
        let recs = vec![xl(true, anchor(true, 1.0, 2), anchor(true, 2.0, 3))];
        let mut stats = ClassifyStats::default();
        let out = classify_frame(&recs, 2, &mut stats);
        assert_eq!(out.doubly[0], vec![1.0]);
        assert_eq!(out.doubly[1], vec![2.0]);

        // The same frame under the 1-based offset drops the pair instead.
        let mut stats1 = ClassifyStats::default();
        let out1 = classify_frame(&recs, 1, &mut stats1);
        assert_eq!(stats1.out_of_range, 1);
        assert!(out1.doubly[0].is_empty());
    }

    #[test]
    fn shift_recenters_every_list() {
        let recs = vec![xl(true, anchor(true, 2.0, 1), anchor(true, 4.0, 2))];
        let mut stats = ClassifyStats::default();
        let mut out = classify_frame(&recs, 1, &mut stats);
        out.shift(-5.0);
        assert_eq!(out.doubly[0], vec![-3.0]);
        assert_eq!(out.doubly[1], vec![-1.0]);
    }
}
