//! Register ids.

use std::fmt;

/// First id in the virtual register space.
///
/// Ids below this are physical registers; ids at or above it are virtual.
/// Targets describe at most this many physical registers.
pub const FIRST_VIRTUAL_REG: u32 = 1 << 16;

/// Whether a register names a hardware register or a pre-allocation value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegKind {
    /// A fixed hardware register. May hold unrelated values over time.
    Physical,
    /// A value awaiting assignment. Has one reaching definition per live range.
    Virtual,
}

/// Register id within a machine function.
///
/// The id space is shared: `Reg::phys(n)` and `Reg::virt(n)` never collide.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Reg(u32);

impl Reg {
    /// Create a register from a raw id.
    #[inline]
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Physical register number `n`.
    #[inline]
    pub fn phys(n: u32) -> Self {
        debug_assert!(n < FIRST_VIRTUAL_REG, "physical register {n} out of range");
        Self(n)
    }

    /// Virtual register number `n`.
    #[inline]
    pub fn virt(n: u32) -> Self {
        Self(FIRST_VIRTUAL_REG + n)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn kind(self) -> RegKind {
        if self.0 >= FIRST_VIRTUAL_REG {
            RegKind::Virtual
        } else {
            RegKind::Physical
        }
    }

    #[inline]
    pub fn is_virtual(self) -> bool {
        self.kind() == RegKind::Virtual
    }

    #[inline]
    pub fn is_physical(self) -> bool {
        self.kind() == RegKind::Physical
    }

    /// Index within the register's own space (`n` for `phys(n)` / `virt(n)`).
    #[inline]
    pub fn number(self) -> u32 {
        match self.kind() {
            RegKind::Physical => self.0,
            RegKind::Virtual => self.0 - FIRST_VIRTUAL_REG,
        }
    }
}

impl fmt::Debug for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            RegKind::Physical => write!(f, "%p{}", self.number()),
            RegKind::Virtual => write!(f, "%v{}", self.number()),
        }
    }
}
