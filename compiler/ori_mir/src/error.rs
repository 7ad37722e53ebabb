//! Structural errors in machine IR.

use crate::{MachBlockId, MachInstrId};

/// A machine function that violates the shape analyses rely on.
///
/// These are internal-invariant failures produced by lowering bugs, not
/// user-facing diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MirError {
    #[error("entry block {entry:?} does not exist ({num_blocks} blocks)")]
    MissingEntry {
        entry: MachBlockId,
        num_blocks: usize,
    },

    #[error("block {block:?} names successor {succ:?} which does not exist")]
    DanglingSuccessor {
        block: MachBlockId,
        succ: MachBlockId,
    },

    #[error("block {block:?} lists instruction {instr:?} which does not exist")]
    DanglingInstr {
        block: MachBlockId,
        instr: MachInstrId,
    },

    #[error("instruction {instr:?} is not owned by any block")]
    UnownedInstr { instr: MachInstrId },

    #[error("instruction {instr:?} is owned by both {first:?} and {second:?}")]
    MultiplyOwnedInstr {
        instr: MachInstrId,
        first: MachBlockId,
        second: MachBlockId,
    },
}
