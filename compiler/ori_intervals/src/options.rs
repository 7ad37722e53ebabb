//! Knobs for the live interval analysis.

/// Configuration for [`LiveIntervals::run_on`](crate::LiveIntervals::run_on).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntervalOptions {
    /// Distance between consecutive instruction indices.
    ///
    /// A stride above 1 leaves unused indices between instructions so later
    /// passes can insert spill code without renumbering. Zero is treated
    /// as 1.
    pub index_stride: u32,

    /// Give every allocatable alias of a defined physical register its own
    /// range at the def.
    pub include_aliases: bool,
}

impl Default for IntervalOptions {
    fn default() -> Self {
        Self {
            index_stride: 1,
            include_aliases: true,
        }
    }
}

impl IntervalOptions {
    /// Default options with the given index stride.
    pub fn with_stride(index_stride: u32) -> Self {
        Self {
            index_stride,
            ..Default::default()
        }
    }

    /// Default options with alias tracking turned off.
    pub fn without_aliases() -> Self {
        Self {
            include_aliases: false,
            ..Default::default()
        }
    }

    /// The stride actually used for numbering.
    #[inline]
    pub fn stride(&self) -> u32 {
        self.index_stride.max(1)
    }
}
