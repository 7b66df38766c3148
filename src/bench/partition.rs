//! Splitting an operation sequence across workers

use std::ops::Range;

/// Split `len` operations into `parts` contiguous, non-overlapping slices
/// covering `0..len`. The first `len % parts` slices get one extra
/// operation, so slice lengths differ by at most one. Returns no slices
/// when `parts` is 0.
pub fn partition(len: usize, parts: usize) -> Vec<Range<usize>> {
    if parts == 0 {
        return Vec::new();
    }

    let base = len / parts;
    let remainder = len % parts;

    let mut slices = Vec::with_capacity(parts);
    let mut start = 0;
    for i in 0..parts {
        let slice_len = base + usize::from(i < remainder);
        slices.push(start..start + slice_len);
        start += slice_len;
    }
    slices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split() {
        assert_eq!(partition(12, 3), vec![0..4, 4..8, 8..12]);
    }

    #[test]
    fn test_remainder_goes_to_first_slices() {
        assert_eq!(partition(10, 4), vec![0..3, 3..6, 6..8, 8..10]);
    }

    #[test]
    fn test_more_parts_than_operations() {
        assert_eq!(partition(2, 4), vec![0..1, 1..2, 2..2, 2..2]);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(partition(5, 0).is_empty());
        assert_eq!(partition(0, 2), vec![0..0, 0..0]);
        assert_eq!(partition(7, 1), vec![0..7]);
    }
}
