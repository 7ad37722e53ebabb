//! Live variables: the per-instruction liveness facts intervals are built
//! from.
//!
//! [`LivenessProvider`] is the interface the interval builder consumes.
//! [`LiveVariables`] implements it with a standard backward dataflow over
//! the machine CFG, then a backward scan of every reachable block to mark
//! last uses (*kills*) and never-read definitions (*dead defs*).
//!
//! # Algorithm
//!
//! 1. **gen/kill** for each block (forward scan): `gen(B)` holds registers
//!    read before being written in B, `kill(B)` registers written in B.
//! 2. **Postorder fixed point**:
//!    - `live_out(B) = ∪ live_in(S)` for each successor S.
//!    - `live_in(B) = gen(B) ∪ (live_out(B) - kill(B))`.
//! 3. **Per-instruction facts**: walk each block backward from `live_out`.
//!    A def of a register not live below it is dead; a use of a register not
//!    live below it is a kill.
//!
//! Only virtual registers and allocatable physical registers are tracked.
//! With [`IntervalOptions::include_aliases`] set, an operand naming a
//! physical register also touches every register the catalogue lists as
//! its alias. With it clear, each operand touches only the register it
//! names, matching the interval builder.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use ori_mir::graph::DepthFirstOrder;
use ori_mir::{MachBlockId, MachFunction, MachInstr, MachInstrId, Reg, RegKind, RegisterCatalogue};

use crate::IntervalOptions;

/// Set of live registers at a program point.
pub type LiveSet = FxHashSet<Reg>;

/// Whole-function liveness summary for one virtual register.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VirtRegInfo {
    /// First reachable definition, in block walk order.
    pub def: Option<MachInstrId>,
    /// Blocks the value is live *through*: live on entry, live on exit, and
    /// not redefined inside. Sorted by block id.
    pub alive_blocks: Vec<MachBlockId>,
    /// Instructions reading the value for the last time on some path.
    pub kills: SmallVec<[MachInstrId; 2]>,
}

/// Liveness facts consumed by the interval builder.
///
/// Implementations must be computed over the same function the intervals
/// are built for. Inconsistent facts (a register live with no reaching
/// definition) are a contract violation and produce meaningless intervals.
pub trait LivenessProvider {
    /// Summary for a virtual register, or `None` if it is never live.
    fn virt_info(&self, reg: Reg) -> Option<&VirtRegInfo>;

    /// Whether `instr` reads `reg` for the last time.
    fn kills(&self, instr: MachInstrId, reg: Reg) -> bool;

    /// Whether the value `instr` writes to `reg` is never read.
    fn def_is_dead(&self, instr: MachInstrId, reg: Reg) -> bool;

    /// Registers live on entry to `block`.
    fn live_in(&self, block: MachBlockId) -> &LiveSet;

    /// Registers live on exit from `block`.
    fn live_out(&self, block: MachBlockId) -> &LiveSet;

    fn is_live_in(&self, block: MachBlockId, reg: Reg) -> bool {
        self.live_in(block).contains(&reg)
    }

    fn is_live_out(&self, block: MachBlockId, reg: Reg) -> bool {
        self.live_out(block).contains(&reg)
    }
}

/// Dataflow-computed [`LivenessProvider`].
pub struct LiveVariables {
    /// Indexed by `MachBlockId::index()`. Empty for unreachable blocks.
    live_in: Vec<LiveSet>,
    /// Indexed by `MachBlockId::index()`. Empty for unreachable blocks.
    live_out: Vec<LiveSet>,
    kills: FxHashSet<(MachInstrId, Reg)>,
    dead_defs: FxHashSet<(MachInstrId, Reg)>,
    virt: FxHashMap<Reg, VirtRegInfo>,
    /// Returned for out-of-range block queries.
    empty: LiveSet,
}

impl LiveVariables {
    /// Compute liveness for every block reachable from the entry.
    ///
    /// Pass the same `options` the intervals will be built with, so both
    /// sides agree on whether aliases are tracked.
    ///
    /// Requires a function that passes [`MachFunction::verify`].
    pub fn compute(
        func: &MachFunction,
        catalogue: &dyn RegisterCatalogue,
        options: &IntervalOptions,
    ) -> Self {
        let num_blocks = func.num_blocks();
        let order = DepthFirstOrder::compute(func);
        let tracked = Tracked {
            catalogue,
            include_aliases: options.include_aliases,
        };

        tracing::debug!(
            function = %func.name,
            num_blocks,
            include_aliases = options.include_aliases,
            "computing live variables"
        );

        // Step 1: gen/kill per reachable block.
        let mut gen: Vec<LiveSet> = vec![LiveSet::default(); num_blocks];
        let mut kill: Vec<LiveSet> = vec![LiveSet::default(); num_blocks];
        for &block in &order.preorder {
            let (block_gen, block_kill) = compute_gen_kill(func, block, &tracked);
            gen[block.index()] = block_gen;
            kill[block.index()] = block_kill;
        }

        // Step 2: fixed point, successors before predecessors.
        let mut live_in: Vec<LiveSet> = vec![LiveSet::default(); num_blocks];
        let mut live_out: Vec<LiveSet> = vec![LiveSet::default(); num_blocks];
        let mut iteration = 0u32;
        loop {
            iteration += 1;
            let mut changed = false;

            for &block in &order.postorder {
                let idx = block.index();
                let mut new_live_out = LiveSet::default();
                for &succ in &func.block(block).succs {
                    new_live_out.extend(live_in[succ.index()].iter().copied());
                }

                let mut new_live_in = gen[idx].clone();
                new_live_in.extend(new_live_out.iter().copied().filter(|r| !kill[idx].contains(r)));

                if new_live_in != live_in[idx] || new_live_out != live_out[idx] {
                    changed = true;
                    live_in[idx] = new_live_in;
                    live_out[idx] = new_live_out;
                }
            }

            if !changed {
                break;
            }
        }

        tracing::debug!(iterations = iteration, "live variables converged");

        // Step 3: per-instruction kill / dead facts.
        let mut result = Self {
            live_in,
            live_out,
            kills: FxHashSet::default(),
            dead_defs: FxHashSet::default(),
            virt: FxHashMap::default(),
            empty: LiveSet::default(),
        };
        for &block in &order.preorder {
            result.mark_block(func, block, &tracked);
        }
        result.collect_virt_info(func, &order, catalogue);
        result
    }

    /// Backward scan of one block from its live-out set.
    fn mark_block(&mut self, func: &MachFunction, block: MachBlockId, tracked: &Tracked<'_>) {
        let mut live = self.live_out[block.index()].clone();

        for &instr_id in func.block(block).instrs.iter().rev() {
            let instr = func.instr(instr_id);

            // Defs first: a read-modify-write operand reads the old value
            // before the new one is written.
            for reg in tracked.defs(instr) {
                if !live.remove(&reg) {
                    self.dead_defs.insert((instr_id, reg));
                }
            }
            for reg in tracked.uses(instr) {
                if live.insert(reg) {
                    self.kills.insert((instr_id, reg));
                }
            }
        }
    }

    fn collect_virt_info(
        &mut self,
        func: &MachFunction,
        order: &DepthFirstOrder,
        catalogue: &dyn RegisterCatalogue,
    ) {
        let mut defined_in: FxHashMap<Reg, FxHashSet<MachBlockId>> = FxHashMap::default();

        for &block in &order.preorder {
            for &instr_id in &func.block(block).instrs {
                let instr = func.instr(instr_id);
                for reg in instr.defined_regs().filter(|&r| catalogue.kind(r) == RegKind::Virtual) {
                    defined_in.entry(reg).or_default().insert(block);
                    let info = self.virt.entry(reg).or_default();
                    if info.def.is_none() {
                        info.def = Some(instr_id);
                    }
                }
                for reg in instr.used_regs().filter(|&r| catalogue.kind(r) == RegKind::Virtual) {
                    if self.kills.contains(&(instr_id, reg)) {
                        let info = self.virt.entry(reg).or_default();
                        if !info.kills.contains(&instr_id) {
                            info.kills.push(instr_id);
                        }
                    }
                }
            }
        }

        let mut blocks_by_id = order.preorder.clone();
        blocks_by_id.sort_unstable();
        for block in blocks_by_id {
            let live_in = &self.live_in[block.index()];
            let live_out = &self.live_out[block.index()];
            for &reg in live_in.intersection(live_out) {
                if catalogue.kind(reg) != RegKind::Virtual {
                    continue;
                }
                let redefined = defined_in.get(&reg).is_some_and(|blocks| blocks.contains(&block));
                if !redefined {
                    self.virt.entry(reg).or_default().alive_blocks.push(block);
                }
            }
        }
    }
}

impl LivenessProvider for LiveVariables {
    fn virt_info(&self, reg: Reg) -> Option<&VirtRegInfo> {
        self.virt.get(&reg)
    }

    fn kills(&self, instr: MachInstrId, reg: Reg) -> bool {
        self.kills.contains(&(instr, reg))
    }

    fn def_is_dead(&self, instr: MachInstrId, reg: Reg) -> bool {
        self.dead_defs.contains(&(instr, reg))
    }

    fn live_in(&self, block: MachBlockId) -> &LiveSet {
        self.live_in.get(block.index()).unwrap_or(&self.empty)
    }

    fn live_out(&self, block: MachBlockId) -> &LiveSet {
        self.live_out.get(block.index()).unwrap_or(&self.empty)
    }
}

/// Precompute gen and kill sets for a single block.
fn compute_gen_kill(func: &MachFunction, block: MachBlockId, tracked: &Tracked<'_>) -> (LiveSet, LiveSet) {
    let mut gen = LiveSet::default();
    let mut kill = LiveSet::default();

    for &instr_id in &func.block(block).instrs {
        let instr = func.instr(instr_id);
        for reg in tracked.uses(instr) {
            if !kill.contains(&reg) {
                gen.insert(reg);
            }
        }
        kill.extend(tracked.defs(instr));
    }

    (gen, kill)
}

/// Which registers an operand touches.
struct Tracked<'a> {
    catalogue: &'a dyn RegisterCatalogue,
    include_aliases: bool,
}

impl Tracked<'_> {
    /// Registers an instruction reads, filtered to tracked.
    fn uses(&self, instr: &MachInstr) -> SmallVec<[Reg; 8]> {
        self.expand(instr.used_regs())
    }

    /// Registers an instruction writes, filtered to tracked.
    fn defs(&self, instr: &MachInstr) -> SmallVec<[Reg; 8]> {
        self.expand(instr.defined_regs())
    }

    fn expand(&self, regs: impl Iterator<Item = Reg>) -> SmallVec<[Reg; 8]> {
        let catalogue = self.catalogue;
        let mut out: SmallVec<[Reg; 8]> = SmallVec::new();
        let mut push = |reg: Reg| {
            if catalogue.is_allocatable(reg) && !out.contains(&reg) {
                out.push(reg);
            }
        };
        for reg in regs {
            push(reg);
            if self.include_aliases && catalogue.kind(reg) == RegKind::Physical {
                for &alias in catalogue.aliases(reg) {
                    push(alias);
                }
            }
        }
        out
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
