use pretty_assertions::assert_eq;

use crate::test_helpers::{b, make_func};

use super::DepthFirstOrder;

/// 0 → 1 → 3, 0 → 2 → 3. The first successor's subtree comes first.
#[test]
fn diamond_preorder_follows_successor_order() {
    let func = make_func(vec![vec![]; 4], &[(0, 1), (0, 2), (1, 3), (2, 3)]);
    let order = DepthFirstOrder::compute(&func);

    assert_eq!(order.preorder, vec![b(0), b(1), b(3), b(2)]);
    assert_eq!(order.postorder, vec![b(3), b(1), b(2), b(0)]);
}

#[test]
fn swapped_successors_swap_preorder() {
    let func = make_func(vec![vec![]; 4], &[(0, 2), (0, 1), (1, 3), (2, 3)]);
    let order = DepthFirstOrder::compute(&func);

    assert_eq!(order.preorder, vec![b(0), b(2), b(3), b(1)]);
}

#[test]
fn unreachable_blocks_are_skipped() {
    // b2 only jumps into the reachable part; nothing reaches it.
    let func = make_func(vec![vec![]; 3], &[(0, 1), (2, 1)]);
    let order = DepthFirstOrder::compute(&func);

    assert_eq!(order.preorder, vec![b(0), b(1)]);
    assert!(!order.preorder.contains(&b(2)));
    assert_eq!(order.postorder.len(), 2);
}

#[test]
fn loop_back_edge_visits_once() {
    // 0 → 1 → 2 → 1, 2 → 3
    let func = make_func(vec![vec![]; 4], &[(0, 1), (1, 2), (2, 1), (2, 3)]);
    let order = DepthFirstOrder::compute(&func);

    assert_eq!(order.preorder, vec![b(0), b(1), b(2), b(3)]);
    assert_eq!(order.postorder, vec![b(3), b(2), b(1), b(0)]);
}

#[test]
fn entry_other_than_block_zero() {
    let mut func = make_func(vec![vec![]; 2], &[(1, 0)]);
    func.entry = b(1);
    let order = DepthFirstOrder::compute(&func);

    assert_eq!(order.preorder, vec![b(1), b(0)]);
}
