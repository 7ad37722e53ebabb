//! Shared CFG utilities for machine IR analyses.
//!
//! Functions here are generic graph operations on [`MachFunction`] that
//! more than one analysis needs (instruction numbering walks blocks in
//! depth-first preorder, liveness iterates in postorder). They live here
//! so analyses do not import from each other.

use crate::{MachBlockId, MachFunction};

/// Depth-first orders of the blocks reachable from the entry.
///
/// Both orders come from the same walk: successors are explored in the
/// order the block lists them, so the first successor's subtree is
/// numbered before the second's. Unreachable blocks appear in neither.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepthFirstOrder {
    /// Blocks in the order they were first visited.
    pub preorder: Vec<MachBlockId>,
    /// Blocks in the order their subtrees finished.
    pub postorder: Vec<MachBlockId>,
}

impl DepthFirstOrder {
    /// Walk `func` from its entry block.
    ///
    /// Uses an explicit stack to avoid recursion depth issues on deeply
    /// nested CFGs. Out-of-range successors are skipped; callers that care
    /// should run [`MachFunction::verify`] first.
    pub fn compute(func: &MachFunction) -> Self {
        let num_blocks = func.blocks.len();
        let mut visited = vec![false; num_blocks];
        let mut preorder = Vec::with_capacity(num_blocks);
        let mut postorder = Vec::with_capacity(num_blocks);

        if func.entry.index() >= num_blocks {
            return Self {
                preorder,
                postorder,
            };
        }

        // Stack entries: (block, index of the next successor to explore).
        let mut stack: Vec<(MachBlockId, usize)> = vec![(func.entry, 0)];
        visited[func.entry.index()] = true;
        preorder.push(func.entry);

        while let Some(&mut (block, ref mut next)) = stack.last_mut() {
            let succs = &func.blocks[block.index()].succs;
            if let Some(&succ) = succs.get(*next) {
                *next += 1;
                if succ.index() < num_blocks && !visited[succ.index()] {
                    visited[succ.index()] = true;
                    preorder.push(succ);
                    stack.push((succ, 0));
                }
            } else {
                postorder.push(block);
                stack.pop();
            }
        }

        Self {
            preorder,
            postorder,
        }
    }
}

#[cfg(test)]
mod tests;
