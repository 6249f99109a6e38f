//! Tests for the visited set used by graph walks

#[cfg(test)]
mod tests {
    use slicecomp::algorithm::bitset::VisitedSet;

    // Tests insert reports first visits only
    // Verified by always returning true from insert
    #[test]
    fn test_insert_reports_first_visit() {
        let mut visited = VisitedSet::new(4);

        assert!(visited.insert(2));
        assert!(!visited.insert(2));
        assert!(visited.contains(2));
        assert!(!visited.contains(1));
        assert_eq!(visited.count(), 1);
    }

    // Tests ids beyond the capacity are ignored
    // Verified by removing the bounds check
    #[test]
    fn test_out_of_range_ignored() {
        let mut visited = VisitedSet::new(2);

        assert!(!visited.insert(5));
        assert!(!visited.contains(5));
        assert_eq!(visited.count(), 0);
    }

    // Tests missing ids and fullness
    // Verified by returning marked ids from missing
    #[test]
    fn test_missing_and_full() {
        let mut visited = VisitedSet::new(3);
        visited.insert(0);
        visited.insert(2);

        assert_eq!(visited.missing(), vec![1]);
        assert!(!visited.is_full());

        visited.insert(1);
        assert!(visited.missing().is_empty());
        assert!(visited.is_full());
    }
}
