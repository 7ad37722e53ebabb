//! Register catalogue: what kind of register an id is, whether the
//! allocator may use it, and which physical registers overlap.

use std::borrow::Cow;

use smallvec::SmallVec;

use crate::{Reg, RegKind};

/// Target register information consumed by register allocation analyses.
pub trait RegisterCatalogue {
    /// Classify a register.
    fn kind(&self, reg: Reg) -> RegKind {
        reg.kind()
    }

    /// Whether the allocator may assign or track this register.
    ///
    /// Virtual registers are always allocatable. Physical registers such as
    /// the stack pointer are not, and analyses skip them entirely.
    fn is_allocatable(&self, reg: Reg) -> bool;

    /// Physical registers that share storage with `reg` (sub- and
    /// super-registers), excluding `reg` itself.
    fn aliases(&self, reg: Reg) -> &[Reg];

    /// Human-readable register name for dumps.
    fn name(&self, reg: Reg) -> Cow<'_, str> {
        Cow::Owned(reg.to_string())
    }
}

/// Description of one physical register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhysRegDesc {
    pub name: String,
    pub allocatable: bool,
    pub aliases: SmallVec<[Reg; 4]>,
}

/// Table-driven [`RegisterCatalogue`].
///
/// Physical registers are numbered in the order they are added, starting
/// at `Reg::phys(0)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterTable {
    regs: Vec<PhysRegDesc>,
}

impl RegisterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Describe the next physical register and return its id.
    pub fn add(&mut self, name: impl Into<String>, allocatable: bool) -> Reg {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "targets describe fewer than FIRST_VIRTUAL_REG registers"
        )]
        let reg = Reg::phys(self.regs.len() as u32);
        self.regs.push(PhysRegDesc {
            name: name.into(),
            allocatable,
            aliases: SmallVec::new(),
        });
        reg
    }

    /// Record that `a` and `b` overlap. The relation is symmetric.
    pub fn add_alias(&mut self, a: Reg, b: Reg) {
        if a == b {
            return;
        }
        for (from, to) in [(a, b), (b, a)] {
            if let Some(desc) = self.desc_mut(from) {
                if !desc.aliases.contains(&to) {
                    desc.aliases.push(to);
                }
            }
        }
    }

    /// Number of physical registers described.
    pub fn len(&self) -> usize {
        self.regs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    pub fn desc(&self, reg: Reg) -> Option<&PhysRegDesc> {
        if reg.is_physical() {
            self.regs.get(reg.number() as usize)
        } else {
            None
        }
    }

    fn desc_mut(&mut self, reg: Reg) -> Option<&mut PhysRegDesc> {
        if reg.is_physical() {
            self.regs.get_mut(reg.number() as usize)
        } else {
            None
        }
    }
}

impl RegisterCatalogue for RegisterTable {
    fn is_allocatable(&self, reg: Reg) -> bool {
        match reg.kind() {
            RegKind::Virtual => true,
            RegKind::Physical => self.desc(reg).is_some_and(|d| d.allocatable),
        }
    }

    fn aliases(&self, reg: Reg) -> &[Reg] {
        match self.desc(reg) {
            Some(d) => &d.aliases,
            None => &[],
        }
    }

    fn name(&self, reg: Reg) -> Cow<'_, str> {
        match self.desc(reg) {
            Some(d) => Cow::Borrowed(d.name.as_str()),
            None => Cow::Owned(reg.to_string()),
        }
    }
}

#[cfg(test)]
mod tests;
