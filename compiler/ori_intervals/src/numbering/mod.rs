//! Instruction numbering.
//!
//! Walks the blocks reachable from the entry in depth-first preorder
//! (successors in the order each block lists them) and gives every
//! instruction a strictly increasing [`InstrIndex`]. The walk order is
//! recorded as the block order; each numbered block also records the
//! half-open index range its instructions occupy.
//!
//! Unreachable blocks are never numbered, so registers defined only there
//! never get an interval.
//!
//! Indices are spaced by the configured stride. Consumers must not assume
//! consecutive instructions have consecutive indices.

use std::fmt;

use ori_mir::graph::DepthFirstOrder;
use ori_mir::{MachBlockId, MachFunction, MachInstrId};

use crate::{IntervalError, IntervalOptions};

/// A program point in the linear instruction order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct InstrIndex(u32);

impl InstrIndex {
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// The point just past this one. Live ranges ending at a last use
    /// end here, so the use itself is covered.
    #[inline]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for InstrIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index range `[start, end)` covered by one block.
///
/// `end` is the index the next block's first instruction would get, so
/// blocks adjacent in the order produce touching ranges. A block without
/// instructions has `start == end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockRange {
    pub start: InstrIndex,
    pub end: InstrIndex,
}

impl BlockRange {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// The result of numbering one function.
///
/// Immutable once built. Renumbering after the function changes
/// invalidates every interval computed from the old numbering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstrNumbering {
    /// Index per instruction handle; `None` for unreachable instructions.
    instr_index: Vec<Option<InstrIndex>>,
    /// Owning block per instruction handle, for numbered instructions.
    instr_block: Vec<Option<MachBlockId>>,
    /// Numbered blocks in walk order.
    block_order: Vec<MachBlockId>,
    /// Range per block handle; `None` for unreachable blocks.
    block_ranges: Vec<Option<BlockRange>>,
}

impl InstrNumbering {
    /// Number every reachable instruction of `func`.
    ///
    /// Requires a function that passes [`MachFunction::verify`].
    pub fn assign(func: &MachFunction, options: &IntervalOptions) -> Result<Self, IntervalError> {
        let stride = options.stride();
        let order = DepthFirstOrder::compute(func);

        let mut instr_index = vec![None; func.num_instrs()];
        let mut instr_block = vec![None; func.num_instrs()];
        let mut block_ranges = vec![None; func.num_blocks()];
        let mut next = 0u32;

        let overflow = || IntervalError::IndexOverflow {
            function: func.name.clone(),
            stride,
        };

        for &block_id in &order.preorder {
            let start = InstrIndex(next);
            for &instr in &func.block(block_id).instrs {
                instr_index[instr.index()] = Some(InstrIndex(next));
                instr_block[instr.index()] = Some(block_id);
                next = next.checked_add(stride).ok_or_else(overflow)?;
            }
            block_ranges[block_id.index()] = Some(BlockRange {
                start,
                end: InstrIndex(next),
            });
        }

        tracing::trace!(
            function = %func.name,
            blocks = order.preorder.len(),
            next_index = next,
            "numbered instructions"
        );

        Ok(Self {
            instr_index,
            instr_block,
            block_order: order.preorder,
            block_ranges,
        })
    }

    /// Index of `instr`, or `None` if it sits in an unreachable block.
    #[inline]
    pub fn index_of(&self, instr: MachInstrId) -> Option<InstrIndex> {
        self.instr_index.get(instr.index()).copied().flatten()
    }

    /// Block owning a numbered instruction.
    #[inline]
    pub fn block_of(&self, instr: MachInstrId) -> Option<MachBlockId> {
        self.instr_block.get(instr.index()).copied().flatten()
    }

    /// Index range of a numbered block.
    #[inline]
    pub fn block_range(&self, block: MachBlockId) -> Option<BlockRange> {
        self.block_ranges.get(block.index()).copied().flatten()
    }

    /// Numbered blocks in the order their indices were assigned.
    #[inline]
    pub fn block_order(&self) -> &[MachBlockId] {
        &self.block_order
    }

    #[inline]
    pub fn is_numbered(&self, block: MachBlockId) -> bool {
        self.block_range(block).is_some()
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
