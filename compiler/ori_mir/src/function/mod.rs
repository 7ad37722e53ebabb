//! Machine functions and blocks.
//!
//! A [`MachFunction`] owns two arenas: every instruction lives in
//! `instrs`, every block in `blocks`. Blocks list their instructions by
//! [`MachInstrId`] in execution order, and their successors by
//! [`MachBlockId`] in branch order. Analyses only ever hold handles, so a
//! later pass reordering instructions cannot leave them dangling.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::{MachBlockId, MachInstr, MachInstrId, MirError};

/// A basic block: straight-line instructions plus outgoing edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachBlock {
    pub id: MachBlockId,
    /// Instructions in execution order.
    pub instrs: Vec<MachInstrId>,
    /// Successor blocks in branch order (taken target first).
    pub succs: SmallVec<[MachBlockId; 2]>,
}

/// A function body in machine IR.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachFunction {
    pub name: String,
    /// Blocks in declaration order, indexed by `MachBlockId::index()`.
    pub blocks: Vec<MachBlock>,
    /// Instruction arena, indexed by `MachInstrId::index()`.
    pub instrs: Vec<MachInstr>,
    pub entry: MachBlockId,
}

impl MachFunction {
    #[inline]
    pub fn block(&self, id: MachBlockId) -> &MachBlock {
        &self.blocks[id.index()]
    }

    #[inline]
    pub fn instr(&self, id: MachInstrId) -> &MachInstr {
        &self.instrs[id.index()]
    }

    #[inline]
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn num_instrs(&self) -> usize {
        self.instrs.len()
    }

    /// Check the structural preconditions analyses rely on.
    ///
    /// - the entry block exists,
    /// - every successor and instruction handle is in range,
    /// - every instruction is owned by exactly one block.
    ///
    /// Returns the owning block of every instruction on success.
    pub fn verify(&self) -> Result<Vec<MachBlockId>, MirError> {
        let num_blocks = self.blocks.len();
        if self.entry.index() >= num_blocks {
            return Err(MirError::MissingEntry {
                entry: self.entry,
                num_blocks,
            });
        }

        let mut owner: Vec<Option<MachBlockId>> = vec![None; self.instrs.len()];
        for block in &self.blocks {
            for &succ in &block.succs {
                if succ.index() >= num_blocks {
                    return Err(MirError::DanglingSuccessor {
                        block: block.id,
                        succ,
                    });
                }
            }
            for &instr in &block.instrs {
                let Some(slot) = owner.get_mut(instr.index()) else {
                    return Err(MirError::DanglingInstr {
                        block: block.id,
                        instr,
                    });
                };
                if let Some(first) = *slot {
                    return Err(MirError::MultiplyOwnedInstr {
                        instr,
                        first,
                        second: block.id,
                    });
                }
                *slot = Some(block.id);
            }
        }

        owner
            .into_iter()
            .enumerate()
            .map(|(idx, slot)| {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "instruction arenas are indexed by u32 handles"
                )]
                let instr = MachInstrId::new(idx as u32);
                slot.ok_or(MirError::UnownedInstr { instr })
            })
            .collect()
    }
}

/// Incremental constructor for [`MachFunction`].
///
/// The first block created is the entry unless [`set_entry`](Self::set_entry)
/// says otherwise. `finish` does not verify; call
/// [`MachFunction::verify`] before handing the function to an analysis.
pub struct FunctionBuilder {
    name: String,
    blocks: Vec<MachBlock>,
    instrs: Vec<MachInstr>,
    entry: MachBlockId,
    /// Edges already added, to keep successor lists free of duplicates.
    edges: FxHashSet<(MachBlockId, MachBlockId)>,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blocks: Vec::new(),
            instrs: Vec::new(),
            entry: MachBlockId::new(0),
            edges: FxHashSet::default(),
        }
    }

    /// Append a new empty block.
    pub fn create_block(&mut self) -> MachBlockId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "block counts fit in u32"
        )]
        let id = MachBlockId::new(self.blocks.len() as u32);
        self.blocks.push(MachBlock {
            id,
            instrs: Vec::new(),
            succs: SmallVec::new(),
        });
        id
    }

    /// Append `instr` to the end of `block`.
    pub fn push(&mut self, block: MachBlockId, instr: MachInstr) -> MachInstrId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "instruction counts fit in u32"
        )]
        let id = MachInstrId::new(self.instrs.len() as u32);
        self.instrs.push(instr);
        self.blocks[block.index()].instrs.push(id);
        id
    }

    /// Add a control-flow edge. Repeated edges are ignored.
    pub fn add_edge(&mut self, from: MachBlockId, to: MachBlockId) {
        if self.edges.insert((from, to)) {
            self.blocks[from.index()].succs.push(to);
        }
    }

    pub fn set_entry(&mut self, entry: MachBlockId) {
        self.entry = entry;
    }

    pub fn finish(self) -> MachFunction {
        MachFunction {
            name: self.name,
            blocks: self.blocks,
            instrs: self.instrs,
            entry: self.entry,
        }
    }
}
