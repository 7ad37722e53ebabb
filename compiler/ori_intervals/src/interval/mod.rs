//! Live ranges and intervals.
//!
//! An [`Interval`] is the full liveness of one register: a list of
//! half-open [`LiveRange`]s kept
//!
//! - sorted ascending by `start`,
//! - pairwise non-overlapping,
//! - pairwise non-adjacent (`a.end == b.start` is always coalesced).
//!
//! Every query below relies on that invariant, and [`Interval::add_range`]
//! is the only way to grow an interval, so it is maintained in one place.
//!
//! Interval *equality* compares registers only, not ranges. The allocator's
//! bookkeeping uses intervals as per-register entities (active sets,
//! deduplication), and two intervals for the same register are the same
//! entity even while one is being extended. `Hash` agrees with this.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use ori_mir::{Reg, RegisterCatalogue};
use smallvec::SmallVec;

use crate::numbering::InstrIndex;

/// The half-open index range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LiveRange {
    pub start: InstrIndex,
    pub end: InstrIndex,
}

impl LiveRange {
    /// Create a range. `end` must be past `start`.
    #[inline]
    pub fn new(start: InstrIndex, end: InstrIndex) -> Self {
        debug_assert!(start < end, "empty live range [{start}, {end})");
        Self { start, end }
    }

    /// `[at, at + 1)`: a value defined and never read.
    #[inline]
    pub fn point(at: InstrIndex) -> Self {
        Self::new(at, at.next())
    }

    #[inline]
    pub fn contains(&self, index: InstrIndex) -> bool {
        self.start <= index && index < self.end
    }

    #[inline]
    pub fn overlaps(&self, other: &LiveRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for LiveRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{})", self.start, self.end)
    }
}

/// The live ranges of one register, plus its spill weight.
#[derive(Clone, Debug)]
pub struct Interval {
    reg: Reg,
    /// Number of uses folded into this interval.
    weight: u32,
    ranges: SmallVec<[LiveRange; 4]>,
}

impl Interval {
    /// Create an interval holding a single range.
    ///
    /// There is no empty interval: an interval only exists once its
    /// register is live somewhere, so `start()`/`end()` are always defined.
    pub fn new(reg: Reg, range: LiveRange) -> Self {
        let mut ranges = SmallVec::new();
        ranges.push(range);
        Self {
            reg,
            weight: 0,
            ranges,
        }
    }

    #[inline]
    pub fn reg(&self) -> Reg {
        self.reg
    }

    #[inline]
    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Ranges in ascending order.
    #[inline]
    pub fn ranges(&self) -> &[LiveRange] {
        &self.ranges
    }

    /// First index at which the register is live.
    #[inline]
    pub fn start(&self) -> InstrIndex {
        self.ranges[0].start
    }

    /// One past the last index at which the register is live.
    #[inline]
    pub fn end(&self) -> InstrIndex {
        self.ranges[self.ranges.len() - 1].end
    }

    /// Count `uses` more uses toward the spill weight.
    ///
    /// Saturates rather than wrapping, so the weight never decreases.
    #[inline]
    pub fn add_weight(&mut self, uses: u32) {
        self.weight = self.weight.saturating_add(uses);
    }

    /// Add `range`, coalescing it with every range it overlaps or touches.
    ///
    /// 1. Binary search for the first range starting after `range.start`.
    /// 2. If the range before that point reaches `range.start`, extend it
    ///    instead of inserting (merge backward).
    /// 3. Absorb every following range the result now reaches (merge
    ///    forward).
    pub fn add_range(&mut self, range: LiveRange) {
        let pos = self.ranges.partition_point(|r| r.start <= range.start);

        let at = match pos.checked_sub(1) {
            Some(prev) if self.ranges[prev].end >= range.start => {
                let existing = &mut self.ranges[prev];
                existing.end = existing.end.max(range.end);
                prev
            }
            _ => {
                self.ranges.insert(pos, range);
                pos
            }
        };

        let mut absorbed = at + 1;
        while absorbed < self.ranges.len() && self.ranges[absorbed].start <= self.ranges[at].end {
            let end = self.ranges[absorbed].end;
            let merged = &mut self.ranges[at];
            merged.end = merged.end.max(end);
            absorbed += 1;
        }
        if absorbed > at + 1 {
            self.ranges.drain(at + 1..absorbed);
        }
    }

    /// Whether the register is live at `index`.
    pub fn live_at(&self, index: InstrIndex) -> bool {
        let after = self.ranges.partition_point(|r| r.start <= index);
        after
            .checked_sub(1)
            .is_some_and(|candidate| index < self.ranges[candidate].end)
    }

    /// Whether any range of `self` intersects any range of `other`.
    ///
    /// Linear in the total number of ranges: both lists are sorted, so a
    /// single merge-style walk finds the first intersection.
    pub fn overlaps(&self, other: &Interval) -> bool {
        if self.end() <= other.start() || other.end() <= self.start() {
            return false;
        }

        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let (a, b) = (&self.ranges[i], &other.ranges[j]);
            if a.overlaps(b) {
                return true;
            }
            // Drop whichever range finishes first; it cannot meet anything
            // later in the other list.
            if a.end <= b.end {
                i += 1;
            } else {
                j += 1;
            }
        }
        false
    }

    /// Whether the interval is over by `index`.
    ///
    /// Cheaper than [`live_at`](Self::live_at): an allocator retiring
    /// intervals from its active set only needs the upper bound.
    #[inline]
    pub fn expired_at(&self, index: InstrIndex) -> bool {
        self.end() <= index
    }
}

/// Order by earliest start (for opening intervals in a linear scan).
pub fn by_start(a: &Interval, b: &Interval) -> Ordering {
    a.start().cmp(&b.start())
}

/// Order by latest end (for expiring intervals in a linear scan).
pub fn by_end(a: &Interval, b: &Interval) -> Ordering {
    a.end().cmp(&b.end())
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        self.reg == other.reg
    }
}

impl Eq for Interval {}

impl Hash for Interval {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.reg.hash(state);
    }
}

impl Interval {
    /// Format the interval with the catalogue's register name.
    #[inline]
    pub fn display<'a>(&'a self, catalogue: &'a dyn RegisterCatalogue) -> IntervalDisplay<'a> {
        IntervalDisplay {
            name: catalogue.name(self.reg),
            interval: self,
        }
    }

    /// Everything after the register name: ` w=3 [2,9) [12,14)`.
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " w={}", self.weight)?;
        for range in &self.ranges {
            write!(f, " {range}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reg)?;
        self.fmt_body(f)
    }
}

/// Helper for displaying an `Interval` with a resolved register name.
pub struct IntervalDisplay<'a> {
    name: Cow<'a, str>,
    interval: &'a Interval,
}

impl fmt::Display for IntervalDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        self.interval.fmt_body(f)
    }
}

#[cfg(test)]
mod tests;
