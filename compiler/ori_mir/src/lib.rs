//! Machine-level IR for Ori's register allocation passes.
//!
//! This crate provides:
//!
//! - **Registers** ([`Reg`], [`RegKind`]): a single id space split into
//!   physical registers (below [`FIRST_VIRTUAL_REG`]) and virtual registers
//!   (at or above it).
//!
//! - **Machine IR** ([`MachFunction`], [`MachBlock`], [`MachInstr`],
//!   [`MachOperand`]): ordered basic blocks of ordered instructions. Blocks
//!   and instructions live in arenas owned by the function and are referred
//!   to by [`MachBlockId`] / [`MachInstrId`] handles, never by reference.
//!
//! - **Register catalogue** ([`RegisterCatalogue`], [`RegisterTable`]):
//!   classifies registers and reports which physical registers the
//!   allocator may hand out and which overlap each other.
//!
//! - **CFG utilities** ([`graph`]): the depth-first block orders shared by
//!   instruction numbering and liveness.
//!
//! # Crate Dependencies
//!
//! `ori_mir` has no `ori_*` dependencies. Analyses such as `ori_intervals`
//! build on top of it.

mod catalogue;
mod error;
mod function;
pub mod graph;
mod instr;
mod reg;

#[cfg(test)]
mod test_helpers;

pub use catalogue::{PhysRegDesc, RegisterCatalogue, RegisterTable};
pub use error::MirError;
pub use function::{FunctionBuilder, MachBlock, MachFunction};
pub use instr::{MachBlockId, MachInstr, MachInstrId, MachOperand, OperandFlags};
pub use reg::{Reg, RegKind, FIRST_VIRTUAL_REG};
