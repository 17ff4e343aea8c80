// Property-based tests for Range and Rectangle laws.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use gridsel_core::{merge_ranges, subtract_range, Range, Rectangle};

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn arb_range() -> impl Strategy<Value = Range> {
    (0usize..50, 0usize..20).prop_map(|(start, len)| Range::with_len(start, len))
}

fn arb_rect() -> impl Strategy<Value = Rectangle> {
    (0usize..10, 0usize..10, 1usize..6, 1usize..6)
        .prop_map(|(x, y, w, h)| Rectangle::new(x, y, w, h))
}

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn contains_matches_bounds(start in 0usize..100, len in 0usize..50, x in 0usize..200) {
        let r = Range::new(start, start + len);
        prop_assert_eq!(r.contains(x), start <= x && x < start + len);
    }

    #[test]
    fn to_set_is_exact(r in arb_range()) {
        let set = r.to_set();
        prop_assert_eq!(set.len(), r.len());
        prop_assert!(set.iter().all(|&p| r.contains(p)));
    }

    #[test]
    fn sort_by_start_is_ordered(mut ranges in prop::collection::vec(arb_range(), 0..12)) {
        Range::sort_by_start(&mut ranges);
        prop_assert!(ranges.windows(2).all(|w| w[0].start <= w[1].start));
    }

    #[test]
    fn merge_preserves_members(ranges in prop::collection::vec(arb_range(), 0..8)) {
        let merged = merge_ranges(ranges.clone());
        for p in 0..80 {
            let before = ranges.iter().any(|r| r.contains(p));
            let after = merged.iter().any(|r| r.contains(p));
            prop_assert_eq!(before, after);
        }
        prop_assert!(merged.windows(2).all(|w| w[0].end < w[1].start));
    }

    #[test]
    fn subtract_removes_only_removed(r in arb_range(), removed in arb_range()) {
        let rest = subtract_range(&[r], removed);
        for p in 0..80 {
            let expected = r.contains(p) && !removed.contains(p);
            prop_assert_eq!(rest.iter().any(|x| x.contains(p)), expected);
        }
    }

    #[test]
    fn rect_subtract_partitions(a in arb_rect(), b in arb_rect()) {
        let pieces = a.subtract(&b);
        for cell in a.cells() {
            let hits = pieces
                .iter()
                .filter(|p| p.contains(cell.column_position, cell.row_position))
                .count();
            let expected = usize::from(!b.contains(cell.column_position, cell.row_position));
            prop_assert_eq!(hits, expected);
        }
    }
}
