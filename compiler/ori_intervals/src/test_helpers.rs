//! Shared test utilities for the interval analysis. Only compiled in test
//! builds.

use ori_mir::{
    FunctionBuilder, MachBlockId, MachFunction, MachInstr, MachOperand, Reg, RegisterTable,
};

use crate::interval::{Interval, LiveRange};
use crate::numbering::InstrIndex;

/// Shorthand for `Reg::virt(n)`.
pub(crate) fn v(n: u32) -> Reg {
    Reg::virt(n)
}

/// Shorthand for `Reg::phys(n)`.
pub(crate) fn p(n: u32) -> Reg {
    Reg::phys(n)
}

/// Shorthand for `MachBlockId::new(n)`.
pub(crate) fn b(n: u32) -> MachBlockId {
    MachBlockId::new(n)
}

/// Shorthand for `InstrIndex::new(n)`.
pub(crate) fn ix(n: u32) -> InstrIndex {
    InstrIndex::new(n)
}

/// Shorthand for the range `[start, end)`.
pub(crate) fn r(start: u32, end: u32) -> LiveRange {
    LiveRange::new(ix(start), ix(end))
}

/// Build an interval from `(start, end)` pairs, inserted in the given order.
pub(crate) fn interval(reg: Reg, ranges: &[(u32, u32)]) -> Interval {
    let (first, rest) = ranges
        .split_first()
        .unwrap_or_else(|| panic!("interval fixture for {reg} needs a range"));
    let mut iv = Interval::new(reg, r(first.0, first.1));
    for &(s, e) in rest {
        iv.add_range(r(s, e));
    }
    iv
}

/// `op dst<def>, srcs...`
pub(crate) fn def(dst: Reg, srcs: &[Reg]) -> MachInstr {
    MachInstr::new(
        1,
        std::iter::once(MachOperand::def_of(dst)).chain(srcs.iter().map(|&s| MachOperand::use_of(s))),
    )
}

/// An instruction that only reads.
pub(crate) fn use_of(srcs: &[Reg]) -> MachInstr {
    MachInstr::new(2, srcs.iter().map(|&s| MachOperand::use_of(s)))
}

/// A call reading `args` and clobbering `clobbers`.
pub(crate) fn call(args: &[Reg], clobbers: &[Reg]) -> MachInstr {
    MachInstr::new(
        3,
        args.iter()
            .map(|&a| MachOperand::implicit_use(a))
            .chain(clobbers.iter().map(|&c| MachOperand::implicit_def(c))),
    )
}

/// An instruction touching no registers.
pub(crate) fn nop() -> MachInstr {
    MachInstr::new(0, [])
}

/// Build a function from per-block instruction lists and an edge list.
///
/// Block `i` of `blocks` becomes `b(i)`; block 0 is the entry.
pub(crate) fn make_func(blocks: Vec<Vec<MachInstr>>, edges: &[(u32, u32)]) -> MachFunction {
    let mut builder = FunctionBuilder::new("test");
    let ids: Vec<MachBlockId> = blocks.iter().map(|_| builder.create_block()).collect();
    for (id, instrs) in ids.iter().zip(blocks) {
        for instr in instrs {
            builder.push(*id, instr);
        }
    }
    for &(from, to) in edges {
        builder.add_edge(b(from), b(to));
    }
    builder.finish()
}

/// Straight-line single-block function.
pub(crate) fn straight_line(instrs: Vec<MachInstr>) -> MachFunction {
    make_func(vec![instrs], &[])
}

/// Eight allocatable registers `r0..r7`, a non-allocatable `sp` (p8), a
/// sub-register `r0l` (p9) aliasing `r0`, and a non-allocatable
/// super-register `r1w` (p10) aliasing `r1`.
pub(crate) fn test_regs() -> RegisterTable {
    let mut table = RegisterTable::new();
    for n in 0..8 {
        table.add(format!("r{n}"), true);
    }
    table.add("sp", false);
    let r0l = table.add("r0l", true);
    table.add_alias(p(0), r0l);
    let r1w = table.add("r1w", false);
    table.add_alias(p(1), r1w);
    table
}
