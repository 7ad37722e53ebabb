use std::collections::HashSet;

use pretty_assertions::assert_eq;

use crate::test_helpers::{interval, ix, p, r, test_regs, v};

use super::{by_end, by_start, Interval, LiveRange};

fn assert_normalized(iv: &Interval) {
    for pair in iv.ranges().windows(2) {
        assert!(
            pair[0].end < pair[1].start,
            "ranges {} and {} overlap or touch in {iv}",
            pair[0],
            pair[1]
        );
    }
}

// addRange / merge

#[test]
fn touching_ranges_coalesce() {
    let iv = interval(v(0), &[(5, 10), (10, 15)]);
    assert_eq!(iv.ranges(), &[r(5, 15)]);
}

#[test]
fn touching_ranges_coalesce_in_reverse_order() {
    let iv = interval(v(0), &[(10, 15), (5, 10)]);
    assert_eq!(iv.ranges(), &[r(5, 15)]);
}

#[test]
fn disjoint_ranges_stay_sorted() {
    let iv = interval(v(0), &[(20, 25), (2, 4), (9, 11)]);
    assert_eq!(iv.ranges(), &[r(2, 4), r(9, 11), r(20, 25)]);
    assert_eq!(iv.start(), ix(2));
    assert_eq!(iv.end(), ix(25));
}

#[test]
fn one_point_gap_is_kept() {
    let iv = interval(v(0), &[(2, 4), (5, 7)]);
    assert_eq!(iv.ranges(), &[r(2, 4), r(5, 7)]);
}

#[test]
fn range_bridging_several_absorbs_them() {
    let iv = interval(v(0), &[(0, 2), (4, 6), (8, 10), (12, 14), (3, 12)]);
    assert_eq!(iv.ranges(), &[r(0, 2), r(3, 14)]);
    assert_normalized(&iv);
}

#[test]
fn covering_range_swallows_everything() {
    let iv = interval(v(0), &[(4, 6), (8, 10), (0, 20)]);
    assert_eq!(iv.ranges(), &[r(0, 20)]);
}

#[test]
fn contained_range_is_a_no_op() {
    let iv = interval(v(0), &[(0, 20), (4, 6)]);
    assert_eq!(iv.ranges(), &[r(0, 20)]);
}

#[test]
fn same_start_longer_end_extends() {
    let iv = interval(v(0), &[(3, 5), (3, 9), (10, 12)]);
    assert_eq!(iv.ranges(), &[r(3, 9), r(10, 12)]);
}

#[test]
fn backward_merge_then_forward_merge() {
    // [6, 9) extends [2, 7) backward, and the result then touches [9, 11).
    let iv = interval(v(0), &[(2, 7), (9, 11), (6, 9)]);
    assert_eq!(iv.ranges(), &[r(2, 11)]);
}

// Queries

#[test]
fn live_at_is_half_open() {
    let iv = interval(v(0), &[(2, 9)]);
    assert!(!iv.live_at(ix(1)));
    assert!(iv.live_at(ix(2)));
    assert!(iv.live_at(ix(8)));
    assert!(!iv.live_at(ix(9)));
}

#[test]
fn live_at_false_in_holes() {
    let iv = interval(v(0), &[(2, 4), (9, 11)]);
    assert!(iv.live_at(ix(3)));
    assert!(!iv.live_at(ix(4)));
    assert!(!iv.live_at(ix(6)));
    assert!(iv.live_at(ix(9)));
    assert!(!iv.live_at(ix(11)));
}

#[test]
fn expired_at_uses_end_only() {
    let iv = interval(v(0), &[(2, 4), (9, 11)]);
    // In a hole but not expired.
    assert!(!iv.expired_at(ix(6)));
    assert!(!iv.expired_at(ix(10)));
    assert!(iv.expired_at(ix(11)));
    assert!(iv.expired_at(ix(40)));
}

#[test]
fn overlaps_interleaved_without_intersection() {
    let a = interval(v(0), &[(0, 2), (4, 6), (8, 10)]);
    let b = interval(v(1), &[(2, 4), (6, 8), (10, 12)]);
    assert!(!a.overlaps(&b));
    assert!(!b.overlaps(&a));
}

#[test]
fn overlaps_finds_late_intersection() {
    let a = interval(v(0), &[(0, 2), (4, 6), (8, 10)]);
    let b = interval(v(1), &[(2, 4), (6, 9)]);
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
}

#[test]
fn overlaps_disjoint_bounds() {
    let a = interval(v(0), &[(0, 5)]);
    let b = interval(v(1), &[(5, 9)]);
    assert!(!a.overlaps(&b));
}

#[test]
fn overlaps_nested() {
    let outer = interval(v(0), &[(0, 100)]);
    let inner = interval(v(1), &[(40, 41)]);
    assert!(outer.overlaps(&inner));
    assert!(inner.overlaps(&outer));
}

// Weight

#[test]
fn weight_accumulates_in_any_order() {
    let mut a = interval(v(0), &[(0, 4)]);
    let mut b = interval(v(0), &[(0, 4)]);
    for n in [1, 3, 2] {
        a.add_weight(n);
    }
    for n in [2, 1, 3] {
        b.add_weight(n);
    }
    assert_eq!(a.weight(), 6);
    assert_eq!(a.weight(), b.weight());
}

#[test]
fn weight_saturates() {
    let mut iv = interval(v(0), &[(0, 4)]);
    iv.add_weight(u32::MAX);
    iv.add_weight(5);
    assert_eq!(iv.weight(), u32::MAX);
}

// Identity & ordering

/// Equality is register identity only. Two intervals with different
/// ranges for the same register compare equal and deduplicate to one.
#[test]
fn equality_ignores_ranges() {
    let a = interval(v(3), &[(0, 4)]);
    let b = interval(v(3), &[(10, 20), (30, 31)]);
    let c = interval(v(4), &[(0, 4)]);

    assert_eq!(a, b);
    assert_ne!(a.ranges(), b.ranges());
    assert_ne!(a, c);

    let set: HashSet<Interval> = [a, b, c].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn comparators_order_by_start_and_end() {
    let long = interval(v(0), &[(0, 30)]);
    let short = interval(v(1), &[(5, 10)]);
    let late = interval(v(2), &[(20, 25)]);

    let mut intervals = vec![late, long, short];
    intervals.sort_by(by_start);
    let regs: Vec<_> = intervals.iter().map(Interval::reg).collect();
    assert_eq!(regs, vec![v(0), v(1), v(2)]);

    intervals.sort_by(by_end);
    let regs: Vec<_> = intervals.iter().map(Interval::reg).collect();
    assert_eq!(regs, vec![v(1), v(2), v(0)]);
}

#[test]
fn display() {
    let mut iv = interval(v(1), &[(2, 9), (12, 14)]);
    iv.add_weight(3);
    assert_eq!(iv.to_string(), "%v1 w=3 [2,9) [12,14)");
    assert_eq!(LiveRange::point(ix(4)).to_string(), "[4,5)");
}

#[test]
fn display_with_register_names() {
    let mut iv = interval(p(9), &[(0, 3)]);
    iv.add_weight(1);
    let regs = test_regs();
    assert_eq!(iv.display(&regs).to_string(), "r0l w=1 [0,3)");
    // Virtual registers have no catalogue name.
    assert_eq!(interval(v(2), &[(1, 2)]).display(&regs).to_string(), "%v2 w=0 [1,2)");
}

// Properties

mod proptest_ranges {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use crate::test_helpers::{ix, r, v};

    use super::super::Interval;
    use super::assert_normalized;

    fn ranges_strategy() -> impl Strategy<Value = Vec<(u32, u32)>> {
        proptest::collection::vec((0u32..200, 1u32..12), 1..24)
            .prop_map(|pairs| pairs.into_iter().map(|(s, len)| (s, s + len)).collect())
    }

    fn build(reg: u32, ranges: &[(u32, u32)]) -> Interval {
        let mut iv = Interval::new(v(reg), r(ranges[0].0, ranges[0].1));
        for &(s, e) in &ranges[1..] {
            iv.add_range(r(s, e));
        }
        iv
    }

    fn points(ranges: &[(u32, u32)]) -> BTreeSet<u32> {
        ranges.iter().flat_map(|&(s, e)| s..e).collect()
    }

    proptest! {
        #[test]
        fn add_range_keeps_ranges_normalized(ranges in ranges_strategy()) {
            let iv = build(0, &ranges);
            assert_normalized(&iv);
        }

        #[test]
        fn live_at_matches_covered_points(ranges in ranges_strategy()) {
            let iv = build(0, &ranges);
            let covered = points(&ranges);
            for point in 0..220 {
                prop_assert_eq!(iv.live_at(ix(point)), covered.contains(&point), "point {}", point);
            }
        }

        #[test]
        fn insertion_order_does_not_matter(ranges in ranges_strategy()) {
            let forward = build(0, &ranges);
            let mut reversed_input = ranges.clone();
            reversed_input.reverse();
            let reversed = build(0, &reversed_input);
            prop_assert_eq!(forward.ranges(), reversed.ranges());
        }

        #[test]
        fn overlaps_is_symmetric_and_exact(a in ranges_strategy(), b in ranges_strategy()) {
            let ia = build(0, &a);
            let ib = build(1, &b);
            let expected = !points(&a).is_disjoint(&points(&b));
            prop_assert_eq!(ia.overlaps(&ib), ib.overlaps(&ia));
            prop_assert_eq!(ia.overlaps(&ib), expected);
        }
    }
}
