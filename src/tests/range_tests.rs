//! Unit tests for exclusion range validation

use crate::error::RangeError;
use crate::range::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_is_valid() {
        let mut ranges: Vec<ExclusionRange> = Vec::new();
        assert_eq!(validate(&mut ranges, 0), Ok(()));
    }

    #[test]
    fn test_valid_set_is_sorted() {
        let mut ranges = vec![
            ExclusionRange::new(15, 6),
            ExclusionRange::new(0, 6),
            ExclusionRange::new(6, 2),
        ];

        assert_eq!(validate(&mut ranges, 21), Ok(()));
        assert_eq!(
            ranges,
            vec![
                ExclusionRange::new(0, 6),
                ExclusionRange::new(6, 2),
                ExclusionRange::new(15, 6),
            ]
        );
    }

    #[test]
    fn test_range_ending_at_file_end_is_in_bounds() {
        let mut ranges = vec![ExclusionRange::new(6, 4)];
        assert_eq!(validate(&mut ranges, 10), Ok(()));
    }

    #[test]
    fn test_negative_offset() {
        let mut ranges = vec![ExclusionRange::new(-1, 2)];
        assert!(matches!(
            validate(&mut ranges, 10),
            Err(RangeError::InvalidRange { reason: "negative offset", .. })
        ));
    }

    #[test]
    fn test_non_positive_size() {
        for size in [0, -4] {
            let mut ranges = vec![ExclusionRange::new(1, size)];
            assert!(
                matches!(
                    validate(&mut ranges, 10),
                    Err(RangeError::InvalidRange { reason: "non-positive size", .. })
                ),
                "size {} should be rejected",
                size
            );
        }
    }

    #[test]
    fn test_out_of_bounds() {
        let mut ranges = vec![ExclusionRange::new(8, 3)];
        assert_eq!(
            validate(&mut ranges, 10),
            Err(RangeError::OutOfBounds {
                offset: 8,
                size: 3,
                total_size: 10,
            })
        );
    }

    #[test]
    fn test_huge_range_does_not_overflow() {
        let mut ranges = vec![ExclusionRange::new(i64::MAX, i64::MAX)];
        assert!(matches!(
            validate(&mut ranges, 10),
            Err(RangeError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_duplicate_offset() {
        let mut ranges = vec![ExclusionRange::new(4, 1), ExclusionRange::new(4, 2)];
        assert_eq!(
            validate(&mut ranges, 10),
            Err(RangeError::DuplicateOffset { offset: 4 })
        );
    }

    #[test]
    fn test_overlapping_ranges() {
        let mut ranges = vec![ExclusionRange::new(5, 2), ExclusionRange::new(2, 4)];
        assert_eq!(
            validate(&mut ranges, 10),
            Err(RangeError::OverlappingRanges {
                previous: ExclusionRange::new(2, 4),
                current: ExclusionRange::new(5, 2),
            })
        );
    }

    #[test]
    fn test_adjacent_ranges_do_not_overlap() {
        let mut ranges = vec![ExclusionRange::new(1, 2), ExclusionRange::new(3, 4)];
        assert_eq!(validate(&mut ranges, 7), Ok(()));
        assert_eq!(covered_bytes(&ranges), 6);
    }

    #[test]
    fn test_per_range_check_precedes_pair_check() {
        // the second range is both a duplicate and out of bounds
        let mut ranges = vec![ExclusionRange::new(4, 1), ExclusionRange::new(4, 20)];
        assert_eq!(
            validate(&mut ranges, 10),
            Err(RangeError::OutOfBounds {
                offset: 4,
                size: 20,
                total_size: 10,
            })
        );
    }

    #[test]
    fn test_end_of_unchecked_range() {
        assert_eq!(ExclusionRange::new(4, 2).end(), 6);
        assert_eq!(ExclusionRange::new(-1, 2).end(), 2);
        assert_eq!(ExclusionRange::new(3, -5).end(), 3);
        assert_eq!(ExclusionRange::new(i64::MAX, i64::MAX).end(), 2 * i64::MAX as u64);
    }

    #[test]
    fn test_display() {
        assert_eq!(ExclusionRange::new(0x3c, 4).to_string(), "[0x3c; 4]");
        assert_eq!(
            RangeError::DuplicateOffset { offset: 16 }.to_string(),
            "Duplicate exclusion offset 0x10 (16)"
        );
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Sorted disjoint ranges built from (gap, size) pairs, and the end of the last one
    fn disjoint_ranges(layout: &[(u8, u8)]) -> (Vec<ExclusionRange>, u64) {
        let mut cursor = 0i64;
        let mut ranges = Vec::new();
        for &(gap, size) in layout {
            cursor += i64::from(gap);
            let size = i64::from(size) + 1;
            ranges.push(ExclusionRange::new(cursor, size));
            cursor += size;
        }
        (ranges, cursor as u64)
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 200,
            verbose: 0,
            max_shrink_iters: 0,
            failure_persistence: None,
            ..ProptestConfig::default()
        })]

        #[test]
        fn test_disjoint_ranges_validate_sorted(
            layout in prop::collection::vec((0u8..16, 0u8..16), 0..20),
            rotation in 0usize..20,
            slack in 0u64..8
        ) {
            let (sorted, total) = disjoint_ranges(&layout);
            let mut ranges = sorted.clone();
            if !ranges.is_empty() {
                let len = ranges.len();
                ranges.rotate_left(rotation % len);
                ranges.reverse();
            }

            prop_assert_eq!(validate(&mut ranges, total + slack), Ok(()));
            prop_assert_eq!(ranges, sorted);
        }

        #[test]
        fn test_intersecting_ranges_rejected(
            offset in 0i64..100,
            size in 2i64..50,
            shift in 1i64..50
        ) {
            prop_assume!(shift < size);
            let mut ranges = vec![
                ExclusionRange::new(offset + shift, 1),
                ExclusionRange::new(offset, size),
            ];

            let result = validate(&mut ranges, 1000);
            let is_overlap = matches!(result, Err(RangeError::OverlappingRanges { .. }));
            prop_assert!(is_overlap);
        }

        #[test]
        fn test_ranges_past_end_rejected(
            offset in 0i64..100,
            size in 1i64..100,
            total in 0u64..100
        ) {
            prop_assume!((offset + size) as u64 > total);
            let mut ranges = vec![ExclusionRange::new(offset, size)];
            let is_out_of_bounds = matches!(
                validate(&mut ranges, total),
                Err(RangeError::OutOfBounds { .. })
            );
            prop_assert!(is_out_of_bounds);
        }
    }
}
