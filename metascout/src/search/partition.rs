use std::ops::Range;

/// Splits `0..len` into `fan_out` contiguous chunks.
///
/// Every chunk but the last has `len / fan_out` records; the last one absorbs
/// the remainder. When `len < fan_out` the leading chunks are empty and the
/// last chunk holds everything. A fan-out of zero is treated as one.
pub fn partition(len: usize, fan_out: usize) -> Vec<Range<usize>> {
    let fan_out = fan_out.max(1);
    let chunk_size = len / fan_out;

    (0..fan_out)
        .map(|i| {
            let start = i * chunk_size;
            let end = if i == fan_out - 1 {
                len
            } else {
                start + chunk_size
            };
            start..end
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_exact_cover(len: usize, fan_out: usize) {
        let chunks = partition(len, fan_out);
        assert_eq!(chunks.len(), fan_out.max(1));

        let mut next = 0;
        for chunk in &chunks {
            assert_eq!(chunk.start, next, "gap or overlap for len={len} fan_out={fan_out}");
            assert!(chunk.end >= chunk.start);
            next = chunk.end;
        }
        assert_eq!(next, len);
        assert_eq!(chunks.iter().map(|c| c.len()).sum::<usize>(), len);
    }

    #[test]
    fn test_covers_every_length_exactly_once() {
        for len in 0..100 {
            for fan_out in 0..40 {
                assert_exact_cover(len, fan_out);
            }
        }
        assert_exact_cover(1_000_003, 32);
    }

    #[test]
    fn test_last_chunk_absorbs_remainder() {
        let chunks = partition(10, 3);
        assert_eq!(chunks, vec![0..3, 3..6, 6..10]);
    }

    #[test]
    fn test_smaller_than_fan_out() {
        let chunks = partition(3, 32);
        assert_eq!(chunks.len(), 32);
        assert!(chunks[..31].iter().all(|c| c.is_empty()));
        assert_eq!(chunks[31], 0..3);
    }

    #[test]
    fn test_zero_fan_out_is_one_chunk() {
        assert_eq!(partition(7, 0), vec![0..7]);
        assert_eq!(partition(0, 0), vec![0..0]);
    }
}
