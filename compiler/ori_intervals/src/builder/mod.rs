//! Interval construction.
//!
//! Walks the numbered blocks in numbering order and, for every register
//! definition, adds the ranges its value is live over:
//!
//! - **Virtual registers** have one reaching definition per value. The def
//!   contributes `[def, end)` in its own block, where `end` is one past the
//!   first kill after the def, the block end if the value is live-out, or
//!   `def + 1` if the def is dead. The first time a register is seen, every
//!   block it is live through contributes its whole range, and every kill
//!   reached by a live-in value contributes `[blockStart, kill + 1)`.
//!
//! - **Physical registers** are reused for unrelated values, so each def
//!   starts its own `[def, end)` piece, computed the same way within the
//!   block. A dead def (a call clobber, an unused implicit result) still
//!   reserves `[def, def + 1)` so the allocator sees the clobber. Values
//!   that cross into a block are covered from the block start when the
//!   provider reports the register live-in there. Allocatable aliases of a
//!   defined register get the same treatment.
//!
//! All pieces go through [`Interval::add_range`], so merging is purely
//! range-algebraic: pieces of unrelated physical values that happen to
//! touch coalesce into one range. Interference only asks "is anything
//! live here", so this is what the allocator expects.
//!
//! Spill weight is the number of use operands of the register in numbered
//! instructions. Uses are tallied during the walk and folded in at the end,
//! so the total does not depend on the order they were found in.
//!
//! Non-allocatable physical registers never get an interval, though a
//! def of one still defines its allocatable aliases. Whether aliases are
//! followed at all is [`IntervalOptions::include_aliases`]; the liveness
//! provider must be computed with the same setting.

use rustc_hash::{FxHashMap, FxHashSet};

use ori_mir::{MachBlockId, MachFunction, MachInstrId, Reg, RegKind, RegisterCatalogue};

use crate::interval::{Interval, LiveRange};
use crate::live_vars::LivenessProvider;
use crate::numbering::{InstrIndex, InstrNumbering};
use crate::IntervalOptions;

/// Build one interval per register live somewhere in `func`.
///
/// Intervals are returned in construction order: the order their registers
/// first became live along the numbering. `numbering` and `liveness` must
/// both describe `func` as it is now.
pub fn compute_intervals(
    func: &MachFunction,
    numbering: &InstrNumbering,
    liveness: &dyn LivenessProvider,
    catalogue: &dyn RegisterCatalogue,
    options: &IntervalOptions,
) -> Vec<Interval> {
    let mut builder = IntervalBuilder {
        func,
        numbering,
        liveness,
        catalogue,
        options,
        intervals: Vec::new(),
        reg_to_interval: FxHashMap::default(),
        seen_virt: FxHashSet::default(),
        use_counts: FxHashMap::default(),
    };

    for &block in numbering.block_order() {
        builder.visit_block(block);
    }
    builder.finish()
}

struct IntervalBuilder<'a> {
    func: &'a MachFunction,
    numbering: &'a InstrNumbering,
    liveness: &'a dyn LivenessProvider,
    catalogue: &'a dyn RegisterCatalogue,
    options: &'a IntervalOptions,
    intervals: Vec<Interval>,
    reg_to_interval: FxHashMap<Reg, usize>,
    /// Virtual registers whose cross-block pieces have been added.
    seen_virt: FxHashSet<Reg>,
    use_counts: FxHashMap<Reg, u32>,
}

impl IntervalBuilder<'_> {
    fn visit_block(&mut self, block: MachBlockId) {
        let mut phys_live_in: Vec<Reg> = self
            .liveness
            .live_in(block)
            .iter()
            .copied()
            .filter(|&r| self.catalogue.kind(r) == RegKind::Physical && self.catalogue.is_allocatable(r))
            .collect();
        phys_live_in.sort_unstable();
        for reg in phys_live_in {
            self.handle_physical_live_in(block, reg);
        }

        let func = self.func;
        for (pos, &instr_id) in func.block(block).instrs.iter().enumerate() {
            let instr = func.instr(instr_id);
            for reg in instr.used_regs() {
                if self.catalogue.is_allocatable(reg) {
                    *self.use_counts.entry(reg).or_insert(0) += 1;
                }
            }
            for reg in instr.defined_regs() {
                self.handle_register_def(block, pos, reg);
            }
        }
    }

    /// Dispatch a def on register kind.
    fn handle_register_def(&mut self, block: MachBlockId, pos: usize, reg: Reg) {
        match self.catalogue.kind(reg) {
            RegKind::Virtual => self.handle_virtual_def(block, pos, reg),
            RegKind::Physical => {
                // A non-allocatable register gets no range, but writing it
                // still writes its allocatable aliases.
                if self.catalogue.is_allocatable(reg) {
                    self.handle_physical_def(block, pos, reg);
                }
                if self.options.include_aliases {
                    let catalogue = self.catalogue;
                    for &alias in catalogue.aliases(reg) {
                        if catalogue.is_allocatable(alias) {
                            self.handle_physical_def(block, pos, alias);
                        }
                    }
                }
            }
        }
    }

    fn handle_virtual_def(&mut self, block: MachBlockId, pos: usize, reg: Reg) {
        let Some(def) = self.def_piece(block, pos, reg) else {
            return;
        };
        tracing::trace!(%reg, range = %def, "virtual def");
        self.add_range(reg, def);

        if !self.seen_virt.insert(reg) {
            return;
        }
        let liveness = self.liveness;
        let Some(info) = liveness.virt_info(reg) else {
            return;
        };

        for &alive in &info.alive_blocks {
            if let Some(range) = self.numbering.block_range(alive) {
                if !range.is_empty() {
                    self.add_range(reg, LiveRange::new(range.start, range.end));
                }
            }
        }

        for &kill in &info.kills {
            let (Some(kill_idx), Some(kill_block)) =
                (self.numbering.index_of(kill), self.numbering.block_of(kill))
            else {
                continue;
            };
            if self.defined_before(kill_block, kill, reg) {
                // Covered by that def's own piece.
                continue;
            }
            if let Some(range) = self.numbering.block_range(kill_block) {
                self.add_range(reg, LiveRange::new(range.start, kill_idx.next()));
            }
        }
    }

    fn handle_physical_def(&mut self, block: MachBlockId, pos: usize, reg: Reg) {
        let Some(def) = self.def_piece(block, pos, reg) else {
            return;
        };
        tracing::trace!(%reg, range = %def, "physical def");
        self.add_range(reg, def);
    }

    /// A physical value flowing into `block` from a predecessor.
    fn handle_physical_live_in(&mut self, block: MachBlockId, reg: Reg) {
        let Some(range) = self.numbering.block_range(block) else {
            return;
        };
        let end = self.end_in_block(block, 0, reg).unwrap_or(range.end);
        if end > range.start {
            tracing::trace!(%reg, block_start = %range.start, %end, "physical live-in");
            self.add_range(reg, LiveRange::new(range.start, end));
        }
    }

    /// The in-block piece for the def at `pos` of `block`.
    fn def_piece(&self, block: MachBlockId, pos: usize, reg: Reg) -> Option<LiveRange> {
        let instr = *self.func.block(block).instrs.get(pos)?;
        let def_idx = self.numbering.index_of(instr)?;

        if self.liveness.def_is_dead(instr, reg) {
            return Some(LiveRange::point(def_idx));
        }
        let end = match self.end_in_block(block, pos + 1, reg) {
            Some(end) => end,
            None if self.liveness.is_live_out(block, reg) => {
                self.numbering.block_range(block).map_or(def_idx.next(), |r| r.end)
            }
            // Neither killed nor live-out: inconsistent facts. Keep the def
            // visible rather than dropping it.
            None => def_idx.next(),
        };
        Some(LiveRange::new(def_idx, end.max(def_idx.next())))
    }

    /// One past the first kill of `reg` at or after `from` in `block`.
    fn end_in_block(&self, block: MachBlockId, from: usize, reg: Reg) -> Option<InstrIndex> {
        let instrs = self.func.block(block).instrs.get(from..)?;
        instrs
            .iter()
            .find(|&&instr| self.liveness.kills(instr, reg))
            .and_then(|&instr| self.numbering.index_of(instr))
            .map(InstrIndex::next)
    }

    /// Whether an instruction of `block` before `kill` writes `reg`.
    fn defined_before(&self, block: MachBlockId, kill: MachInstrId, reg: Reg) -> bool {
        let func = self.func;
        func.block(block)
            .instrs
            .iter()
            .take_while(|&&instr| instr != kill)
            .any(|&instr| func.instr(instr).writes(reg))
    }

    fn add_range(&mut self, reg: Reg, range: LiveRange) {
        if let Some(&idx) = self.reg_to_interval.get(&reg) {
            self.intervals[idx].add_range(range);
        } else {
            self.reg_to_interval.insert(reg, self.intervals.len());
            self.intervals.push(Interval::new(reg, range));
        }
    }

    fn finish(mut self) -> Vec<Interval> {
        for (reg, uses) in self.use_counts {
            if let Some(&idx) = self.reg_to_interval.get(&reg) {
                self.intervals[idx].add_weight(uses);
            }
        }
        self.intervals
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
