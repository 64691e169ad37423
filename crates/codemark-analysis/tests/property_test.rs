//! Property-based tests for partitioning, selection, and span-preserving edits.

use codemark_analysis::engine::{apply_edits, TextEdit};
use codemark_analysis::marking::{select, split_contiguous, SelectionOrder};
use codemark_analysis::parsers::ByteSpan;
use proptest::prelude::*;

fn order_strategy() -> impl Strategy<Value = SelectionOrder> {
    prop_oneof![
        Just(SelectionOrder::Index),
        any::<u64>().prop_map(|seed| SelectionOrder::Hashed { seed }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn partition_is_exact_and_disjoint(len in 0usize..10_000, parts in 1usize..16) {
        let ranges = split_contiguous(len, parts);
        prop_assert_eq!(ranges.len(), parts);
        let mut next = 0;
        for (i, r) in ranges.iter().enumerate() {
            prop_assert_eq!(r.start, next);
            if i + 1 < parts {
                prop_assert_eq!(r.len(), len / parts);
            }
            next = r.end;
        }
        prop_assert_eq!(next, len);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn selections_are_nested_and_complete(
        eligible in proptest::collection::btree_set(0usize..500, 0..80),
        low in 0.0f64..=1.0,
        high in 0.0f64..=1.0,
        order in order_strategy(),
    ) {
        let eligible: Vec<usize> = eligible.into_iter().collect();
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let small = select(&eligible, low, order);
        let large = select(&eligible, high, order);

        prop_assert!(small.poisoned.iter().all(|i| large.poisoned.contains(i)));
        prop_assert_eq!(large.poisoned.len() + large.clean.len(), eligible.len());
        prop_assert!(large.poisoned.iter().all(|i| eligible.contains(i)));
        prop_assert!(large.poisoned.iter().all(|i| !large.clean.contains(i)));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn text_outside_edits_is_preserved(
        source in "[a-z ]{10,60}",
        cut in 0usize..10,
        width in 0usize..5,
        replacement in "[A-Z]{0,8}",
    ) {
        let start = cut.min(source.len());
        let end = (start + width).min(source.len());
        let out = apply_edits(&source, vec![TextEdit {
            span: ByteSpan::new(start, end),
            replacement: replacement.clone(),
        }]).unwrap();
        prop_assert_eq!(&out[..start], &source[..start]);
        prop_assert_eq!(&out[start + replacement.len()..], &source[end..]);
    }
}
