//! Instructions, operands, and arena handles.

use std::fmt;

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::Reg;

// ── ID newtypes ─────────────────────────────────────────────────────

/// Instruction handle into [`MachFunction::instrs`](crate::MachFunction).
///
/// Handles are allocated sequentially starting from 0 and stay valid for
/// the lifetime of the function, independent of where the instruction sits
/// in block order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct MachInstrId(u32);

impl MachInstrId {
    /// Create a new instruction ID from a raw index.
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Get the index as `usize` (for indexing into `Vec`s).
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Basic block handle into [`MachFunction::blocks`](crate::MachFunction).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct MachBlockId(u32);

impl MachBlockId {
    /// Create a new block ID from a raw index.
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Get the index as `usize` (for indexing into `Vec`s).
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ── Operands ────────────────────────────────────────────────────────

bitflags! {
    /// How an instruction touches a register operand.
    ///
    /// A two-address operand is both `USE` and `DEF`: the old value is read
    /// before the new one is written.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct OperandFlags: u8 {
        /// The instruction reads the register.
        const USE = 1 << 0;
        /// The instruction writes the register.
        const DEF = 1 << 1;
        /// Not written in the assembly (call clobbers, flags, fixed results).
        const IMPLICIT = 1 << 2;
    }
}

/// A register operand of a machine instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MachOperand {
    pub reg: Reg,
    pub flags: OperandFlags,
}

impl MachOperand {
    pub fn use_of(reg: Reg) -> Self {
        Self {
            reg,
            flags: OperandFlags::USE,
        }
    }

    pub fn def_of(reg: Reg) -> Self {
        Self {
            reg,
            flags: OperandFlags::DEF,
        }
    }

    /// An implicit definition, e.g. a register clobbered by a call.
    pub fn implicit_def(reg: Reg) -> Self {
        Self {
            reg,
            flags: OperandFlags::DEF | OperandFlags::IMPLICIT,
        }
    }

    pub fn implicit_use(reg: Reg) -> Self {
        Self {
            reg,
            flags: OperandFlags::USE | OperandFlags::IMPLICIT,
        }
    }

    /// A read-modify-write operand.
    pub fn use_def(reg: Reg) -> Self {
        Self {
            reg,
            flags: OperandFlags::USE | OperandFlags::DEF,
        }
    }

    #[inline]
    pub fn is_use(&self) -> bool {
        self.flags.contains(OperandFlags::USE)
    }

    #[inline]
    pub fn is_def(&self) -> bool {
        self.flags.contains(OperandFlags::DEF)
    }
}

// ── Instructions ────────────────────────────────────────────────────

/// A single machine instruction.
///
/// The opcode is target-defined and opaque to the analyses in this
/// workspace; only the register operands matter to them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachInstr {
    pub opcode: u32,
    pub operands: SmallVec<[MachOperand; 4]>,
}

impl MachInstr {
    pub fn new(opcode: u32, operands: impl IntoIterator<Item = MachOperand>) -> Self {
        Self {
            opcode,
            operands: operands.into_iter().collect(),
        }
    }

    /// Registers read by this instruction, in operand order.
    pub fn used_regs(&self) -> impl Iterator<Item = Reg> + '_ {
        self.operands.iter().filter(|op| op.is_use()).map(|op| op.reg)
    }

    /// Registers written by this instruction, in operand order.
    pub fn defined_regs(&self) -> impl Iterator<Item = Reg> + '_ {
        self.operands.iter().filter(|op| op.is_def()).map(|op| op.reg)
    }

    pub fn reads(&self, reg: Reg) -> bool {
        self.used_regs().any(|r| r == reg)
    }

    pub fn writes(&self, reg: Reg) -> bool {
        self.defined_regs().any(|r| r == reg)
    }
}

impl fmt::Display for MachInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op{}", self.opcode)?;
        for (i, op) in self.operands.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            let role = match (op.is_def(), op.is_use()) {
                (true, true) => "<def,use>",
                (true, false) => "<def>",
                (false, _) => "",
            };
            let imp = if op.flags.contains(OperandFlags::IMPLICIT) {
                "<imp>"
            } else {
                ""
            };
            write!(f, "{sep}{}{role}{imp}", op.reg)?;
        }
        Ok(())
    }
}
