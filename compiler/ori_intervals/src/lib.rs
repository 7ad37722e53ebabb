//! Live interval analysis for the Ori register allocator.
//!
//! Given a machine function, computes for every register the set of
//! program-point ranges during which its value is live:
//!
//! - **Numbering** ([`InstrNumbering`]): depth-first walk of the reachable
//!   blocks giving each instruction a strictly increasing [`InstrIndex`].
//! - **Liveness** ([`LivenessProvider`], [`LiveVariables`]): per-instruction
//!   kill and dead-def facts plus block live-in/live-out sets.
//! - **Intervals** ([`Interval`], [`LiveRange`]): sorted, disjoint,
//!   non-adjacent range lists with a spill weight.
//! - **Store** ([`LiveIntervals`]): the finished register → interval map
//!   the allocator queries for interference and scan order.
//!
//! # Usage
//!
//! ```ignore
//! let intervals = LiveIntervals::run_on_function(&func, &regs, &IntervalOptions::default())?;
//! for iv in intervals.sorted_by(ori_intervals::by_start) {
//!     // open iv in a linear scan...
//! }
//! ```
//!
//! # Crate Dependencies
//!
//! `ori_intervals` depends only on `ori_mir` for the machine IR and the
//! register catalogue. Allocation itself lives elsewhere.

mod analysis;
mod builder;
mod error;
mod interval;
mod live_vars;
mod numbering;
mod options;

#[cfg(test)]
mod test_helpers;

pub use analysis::LiveIntervals;
pub use builder::compute_intervals;
pub use error::IntervalError;
pub use interval::{by_end, by_start, Interval, IntervalDisplay, LiveRange};
pub use live_vars::{LiveSet, LiveVariables, LivenessProvider, VirtRegInfo};
pub use numbering::{BlockRange, InstrIndex, InstrNumbering};
pub use options::IntervalOptions;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times, and a no-op
/// when the host has already installed a global subscriber.
/// Enable with `RUST_LOG=ori_intervals=debug` or `RUST_LOG=ori_intervals=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let installed = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
            // A host that installed its own global subscriber keeps it.
            if let Err(err) = installed {
                tracing::debug!(%err, "global subscriber already set, keeping it");
            }
        }
    });
}
