//! Shared test utilities for machine IR. Only compiled in test builds.

use crate::{FunctionBuilder, MachBlockId, MachFunction, MachInstr, MachOperand, Reg};

/// Shorthand for `MachBlockId::new(n)`.
pub(crate) fn b(n: u32) -> MachBlockId {
    MachBlockId::new(n)
}

/// `op0 dst<def>, srcs...`
pub(crate) fn def_use(dst: Reg, srcs: &[Reg]) -> MachInstr {
    MachInstr::new(
        0,
        std::iter::once(MachOperand::def_of(dst)).chain(srcs.iter().map(|&r| MachOperand::use_of(r))),
    )
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
