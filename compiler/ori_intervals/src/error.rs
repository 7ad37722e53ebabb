//! Errors reported by the live interval analysis.

use ori_mir::MirError;

/// Why live intervals could not be computed for a function.
///
/// Every variant is an internal-invariant failure in an upstream pass:
/// the analysis never returns partial results.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IntervalError {
    /// The function failed [`MachFunction::verify`](ori_mir::MachFunction::verify).
    #[error("malformed machine function: {0}")]
    Malformed(#[from] MirError),

    /// Numbering ran out of `u32` indices.
    #[error("function `{function}` has too many instructions to number with stride {stride}")]
    IndexOverflow { function: String, stride: u32 },
}
