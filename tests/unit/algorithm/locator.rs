//! Tests for the pairwise overlap search

#[cfg(test)]
mod tests {
    use crate::fixtures::{abc_slices, abc_source, slice, slice_set, texture};
    use image::{Rgba, RgbaImage};
    use slicecomp::CompositeError;
    use slicecomp::algorithm::locator::{Locator, LocatorConfig, candidate_offsets};
    use slicecomp::spatial::{Offset, SliceImage};

    // Tests the default thresholds validate and bad ones do not
    // Verified by skipping validation in Locator::new
    #[test]
    fn test_config_validation() {
        assert!(LocatorConfig::default().validate().is_ok());

        let bad = [
            LocatorConfig {
                min_similarity: 1.5,
                ..LocatorConfig::default()
            },
            LocatorConfig {
                max_overlap: 0,
                ..LocatorConfig::default()
            },
            LocatorConfig {
                min_overlap_pixels: 0,
                ..LocatorConfig::default()
            },
        ];
        let slices = slice_set(vec![SliceImage::new("a.png", texture(4, 4, 1))]);
        for config in bad {
            assert!(matches!(
                Locator::new(&slices, config),
                Err(CompositeError::InvalidParameter { .. })
            ));
        }
    }

    // Tests candidates are border strips in row-major order
    // Verified by dropping the strip width filter
    #[test]
    fn test_candidate_offsets_are_strips() {
        let offsets: Vec<Offset> = candidate_offsets((10, 10), (10, 10), 2, 1).collect();

        assert!(!offsets.is_empty());
        assert!(!offsets.contains(&Offset::ZERO));
        assert!(offsets.contains(&Offset::new(8, 0)));
        assert!(offsets.contains(&Offset::new(-9, 5)));
        assert!(!offsets.contains(&Offset::new(7, 0)));
        assert!(!offsets.contains(&Offset::new(10, 0)));
        assert_eq!(offsets.first(), Some(&Offset::new(-9, -9)));
        assert!(offsets.windows(2).all(|w| (w[0].y, w[0].x) < (w[1].y, w[1].x)));
    }

    // Tests the area floor removes corner slivers
    // Verified by ignoring min_pixels when filtering
    #[test]
    fn test_candidate_offsets_respect_area() {
        let offsets: Vec<Offset> = candidate_offsets((10, 10), (10, 10), 2, 10).collect();

        assert!(!offsets.contains(&Offset::new(9, 9)));
        assert!(offsets.contains(&Offset::new(9, 0)));
    }

    // Tests the true offset is found for a horizontal neighbour
    // Verified by scoring with the offset negated
    #[test]
    fn test_search_pair_finds_offset() {
        let source = texture(120, 40, 11);
        let slices = slice_set(vec![
            slice("left.png", &source, 0, 0, 70, 40),
            slice("right.png", &source, 60, 0, 60, 40),
        ]);
        let locator = Locator::new(&slices, LocatorConfig::default()).expect("valid config");

        let found = locator.search_pair(0, 1).expect("neighbours match");
        assert_eq!(found.offset, Offset::new(60, 0));
        assert_eq!(found.difference.total(), 0);
        assert!((found.similarity() - 1.0).abs() < f64::EPSILON);

        let reversed = locator.search_pair(1, 0).expect("neighbours match");
        assert_eq!(reversed.offset, Offset::new(-60, 0));
    }

    // Tests unrelated slices stay below the similarity threshold
    // Verified by accepting the best offset regardless of score
    #[test]
    fn test_search_pair_rejects_unrelated() {
        let slices = slice_set(vec![
            SliceImage::new("a.png", texture(40, 40, 1)),
            SliceImage::new("b.png", texture(40, 40, 2)),
        ]);
        let locator = Locator::new(&slices, LocatorConfig::default()).expect("valid config");

        assert!(locator.search_pair(0, 1).is_none());
        assert!(locator.search_pair(0, 5).is_none());
    }

    // Tests equal scores go to the smallest offset, then the first scanned
    // Verified by keeping the last of equally scored offsets
    #[test]
    fn test_search_pair_tie_break() {
        let flat = RgbaImage::from_pixel(10, 10, Rgba([40, 80, 120, 255]));
        let slices = slice_set(vec![
            SliceImage::new("a.png", flat.clone()),
            SliceImage::new("b.png", flat),
        ]);
        let config = LocatorConfig {
            min_similarity: 0.9,
            max_overlap: 4,
            min_overlap_pixels: 1,
        };
        let locator = Locator::new(&slices, config).expect("valid config");

        let found = locator.search_pair(0, 1).expect("flat slices match");
        assert_eq!(found.offset, Offset::new(0, -6));
    }

    // Tests the A/B/C layout yields three consistent matches
    // Verified by stopping the search after the first pair
    #[test]
    fn test_locate_abc() {
        let source = abc_source();
        let slices = slice_set(abc_slices(&source));
        let locator = Locator::new(&slices, LocatorConfig::default()).expect("valid config");

        let mut calls = Vec::new();
        let graph = locator
            .locate_with(|first, second| calls.push((first, second)))
            .expect("all slices connect");

        assert_eq!(locator.pair_count(), 3);
        assert_eq!(calls, vec![(0, 1), (0, 2), (1, 2)]);
        assert_eq!(graph.edge_count(), 3);

        let offsets: Vec<Offset> = graph.edges().iter().map(|e| e.offset).collect();
        assert_eq!(
            offsets,
            vec![Offset::new(80, 0), Offset::new(0, 80), Offset::new(-80, 80)]
        );
    }

    // Tests a slice with no match is reported by name
    // Verified by returning the partial graph
    #[test]
    fn test_locate_reports_unplaced() {
        let source = texture(120, 40, 11);
        let slices = slice_set(vec![
            slice("left.png", &source, 0, 0, 70, 40),
            slice("right.png", &source, 60, 0, 60, 40),
            SliceImage::new("stray.png", texture(30, 30, 99)),
        ]);
        let locator = Locator::new(&slices, LocatorConfig::default()).expect("valid config");

        match locator.locate() {
            Err(CompositeError::InsufficientOverlap {
                slices,
                matches,
                unplaced,
            }) => {
                assert_eq!(slices, 3);
                assert_eq!(matches, 1);
                assert_eq!(unplaced, vec!["stray.png".to_string()]);
            }
            other => panic!("expected insufficient overlap, got {:?}", other.map(|g| g.edge_count())),
        }
    }

    // Tests a single slice needs no matches
    // Verified by requiring at least one edge
    #[test]
    fn test_locate_single_slice() {
        let slices = slice_set(vec![SliceImage::new("only.png", texture(8, 8, 5))]);
        let locator = Locator::new(&slices, LocatorConfig::default()).expect("valid config");

        let graph = locator.locate().expect("one slice is connected");
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(locator.pair_count(), 0);
    }
}
