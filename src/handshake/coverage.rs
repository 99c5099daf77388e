//! Received-range tracking for a single message body.
//!
//! Ranges are kept sorted and coalesced, so a message that arrives in `n`
//! contiguous pieces collapses to one entry however they were ordered.

use std::ops::Range;

/// Sorted set of disjoint, non-adjacent byte ranges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Coverage {
    ranges: Vec<Range<u32>>,
}

impl Coverage {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self { Self { ranges: Vec::new() } }

    /// Merged ranges in ascending order.
    #[must_use]
    pub fn ranges(&self) -> &[Range<u32>] { &self.ranges }

    /// Total number of covered bytes.
    #[must_use]
    pub fn covered_len(&self) -> u64 {
        self.ranges.iter().map(|r| u64::from(r.end - r.start)).sum()
    }

    /// Number of bytes in `range` not yet covered.
    #[must_use]
    pub fn uncovered_len(&self, range: &Range<u32>) -> u32 {
        if range.is_empty() {
            return 0;
        }
        let overlap: u32 = self
            .ranges
            .iter()
            .filter(|r| r.start < range.end && range.start < r.end)
            .map(|r| r.end.min(range.end) - r.start.max(range.start))
            .sum();
        (range.end - range.start) - overlap
    }

    /// Report whether `0..total` is fully covered. An empty message is
    /// always covered.
    #[must_use]
    pub fn covers(&self, total: u32) -> bool {
        if total == 0 {
            return true;
        }
        self.ranges
            .first()
            .is_some_and(|first| first.start == 0 && first.end >= total)
    }

    /// Merge `range` into the set, returning how many bytes were newly
    /// covered.
    pub fn insert(&mut self, range: Range<u32>) -> u32 {
        if range.is_empty() {
            return 0;
        }
        let added = self.uncovered_len(&range);

        // First entry that ends at or after the new start can touch it.
        let lo = self.ranges.partition_point(|r| r.end < range.start);
        // First entry that starts strictly after the new end cannot.
        let hi = self.ranges.partition_point(|r| r.start <= range.end);

        let merged = match self.ranges.get(lo..hi) {
            Some([first, .., last]) => first.start.min(range.start)..last.end.max(range.end),
            Some([only]) => only.start.min(range.start)..only.end.max(range.end),
            _ => range,
        };
        self.ranges.splice(lo..hi, [merged]);
        added
    }
}
