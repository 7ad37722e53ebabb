//! The live interval analysis entry point and the finished interval store.
//!
//! [`LiveIntervals::run_on`] runs the three phases for one function:
//!
//! 1. **Number**: [`InstrNumbering::assign`] fixes the index space and the
//!    block order.
//! 2. **Build**: [`compute_intervals`] turns liveness facts into intervals.
//! 3. **Query**: the returned store is read-only; the allocator asks it for
//!    intervals, block order, and interference.
//!
//! A store describes exactly one function. Analyze the next function with
//! a fresh `run_on` (or [`clear`](LiveIntervals::clear) and reuse).

use std::cmp::Ordering;

use rustc_hash::FxHashMap;

use ori_mir::{MachBlockId, MachFunction, MachInstrId, Reg, RegisterCatalogue};

use crate::builder::compute_intervals;
use crate::interval::Interval;
use crate::live_vars::{LiveVariables, LivenessProvider};
use crate::numbering::{BlockRange, InstrIndex, InstrNumbering};
use crate::{IntervalError, IntervalOptions};

/// Live intervals of every register in one function.
#[derive(Clone, Debug, Default)]
pub struct LiveIntervals {
    numbering: InstrNumbering,
    /// Construction order.
    intervals: Vec<Interval>,
    reg_to_interval: FxHashMap<Reg, usize>,
}

impl LiveIntervals {
    /// Compute intervals for `func` from the given liveness facts.
    ///
    /// Fails without partial results if `func` is structurally malformed
    /// or too large to number.
    pub fn run_on(
        func: &MachFunction,
        liveness: &dyn LivenessProvider,
        catalogue: &dyn RegisterCatalogue,
        options: &IntervalOptions,
    ) -> Result<Self, IntervalError> {
        func.verify()?;

        tracing::debug!(
            function = %func.name,
            num_blocks = func.num_blocks(),
            num_instrs = func.num_instrs(),
            "computing live intervals"
        );

        let numbering = InstrNumbering::assign(func, options)?;
        let intervals = compute_intervals(func, &numbering, liveness, catalogue, options);

        let reg_to_interval = intervals
            .iter()
            .enumerate()
            .map(|(idx, iv)| (iv.reg(), idx))
            .collect();

        let result = Self {
            numbering,
            intervals,
            reg_to_interval,
        };

        tracing::debug!(
            function = %func.name,
            num_intervals = result.intervals.len(),
            "live intervals computed"
        );
        for iv in &result.intervals {
            tracing::trace!(interval = %iv.display(catalogue), "interval");
        }

        Ok(result)
    }

    /// Compute [`LiveVariables`] for `func`, then run the analysis on them.
    pub fn run_on_function(
        func: &MachFunction,
        catalogue: &dyn RegisterCatalogue,
        options: &IntervalOptions,
    ) -> Result<Self, IntervalError> {
        func.verify()?;
        let liveness = LiveVariables::compute(func, catalogue, options);
        Self::run_on(func, &liveness, catalogue, options)
    }

    /// Drop all per-function state.
    pub fn clear(&mut self) {
        self.numbering = InstrNumbering::default();
        self.intervals.clear();
        self.reg_to_interval.clear();
    }

    /// All intervals, in construction order (not sorted by start or end).
    #[inline]
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// The interval of `reg`, if it is live anywhere.
    pub fn interval(&self, reg: Reg) -> Option<&Interval> {
        self.reg_to_interval.get(&reg).map(|&idx| &self.intervals[idx])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Intervals ordered by a comparator such as
    /// [`by_start`](crate::by_start) or [`by_end`](crate::by_end).
    ///
    /// The sort is stable, so ties keep construction order.
    pub fn sorted_by(&self, compare: fn(&Interval, &Interval) -> Ordering) -> Vec<&Interval> {
        let mut sorted: Vec<&Interval> = self.intervals.iter().collect();
        sorted.sort_by(|a, b| compare(a, b));
        sorted
    }

    /// Whether `a` and `b` are both live at some index.
    ///
    /// Registers without an interval interfere with nothing.
    pub fn interfere(&self, a: Reg, b: Reg) -> bool {
        match (self.interval(a), self.interval(b)) {
            (Some(ia), Some(ib)) => ia.overlaps(ib),
            _ => false,
        }
    }

    /// Blocks in numbering order.
    #[inline]
    pub fn ordered_blocks(&self) -> &[MachBlockId] {
        self.numbering.block_order()
    }

    #[inline]
    pub fn instr_index(&self, instr: MachInstrId) -> Option<InstrIndex> {
        self.numbering.index_of(instr)
    }

    #[inline]
    pub fn block_range(&self, block: MachBlockId) -> Option<BlockRange> {
        self.numbering.block_range(block)
    }

    #[inline]
    pub fn numbering(&self) -> &InstrNumbering {
        &self.numbering
    }

    /// One line per interval, using the catalogue's register names.
    pub fn dump(&self, catalogue: &dyn RegisterCatalogue) -> String {
        let mut out = String::new();
        for iv in &self.intervals {
            out.push_str(&iv.display(catalogue).to_string());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
