use std::num::NonZeroUsize;
use std::ops::Range;

/// Partition of an input array into fixed-size, contiguous chunks.
///
/// Chunk `i` covers `[i * chunk_size, min((i + 1) * chunk_size, len))`; only the
/// last chunk may be shorter. A zero chunk size cannot be expressed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ChunkPlan {
    len: usize,
    chunk_size: NonZeroUsize,
}

impl ChunkPlan {
    #[inline]
    pub const fn new(len: usize, chunk_size: NonZeroUsize) -> Self {
        Self { len, chunk_size }
    }

    /// Number of input elements.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn chunk_size(&self) -> NonZeroUsize {
        self.chunk_size
    }

    /// Number of partial sums, `ceil(len / chunk_size)`.
    #[inline]
    pub const fn results_count(&self) -> usize {
        self.len.div_ceil(self.chunk_size.get())
    }

    /// Input range summed by worker `index`.
    ///
    /// Panics if `index >= results_count()`.
    pub fn chunk(&self, index: usize) -> Range<usize> {
        assert!(
            index < self.results_count(),
            "chunk index {index} out of range for {} chunks",
            self.results_count()
        );
        let start = index * self.chunk_size.get();
        let end = start.saturating_add(self.chunk_size.get()).min(self.len);
        start..end
    }

    /// All chunk ranges in index order.
    pub fn chunks(&self) -> impl ExactSizeIterator<Item = Range<usize>> + '_ {
        (0..self.results_count()).map(move |i| self.chunk(i))
    }

    /// Workgroups needed so that every partial sum gets one lane,
    /// `ceil(results_count / execution_width)`.
    #[inline]
    pub fn group_count(&self, execution_width: NonZeroUsize) -> usize {
        self.results_count().div_ceil(execution_width.get())
    }

    /// Whether one chunk of values below `max_value` can exceed `i32::MAX`.
    ///
    /// Partial sums are 32-bit on the device and wrap on overflow.
    pub fn partial_may_overflow(&self, max_value: u32) -> bool {
        let largest_chunk = self.chunk_size.get().min(self.len) as u128;
        let worst = largest_chunk * u128::from(max_value.saturating_sub(1));
        worst > i32::MAX as u128
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(v: usize) -> NonZeroUsize {
        NonZeroUsize::new(v).unwrap()
    }

    fn plan(len: usize, chunk: usize) -> ChunkPlan {
        ChunkPlan::new(len, nz(chunk))
    }

    // ── results_count ─────────────────────────────────────────────────────

    #[test]
    fn single_element_single_chunk() {
        assert_eq!(plan(1, 1).results_count(), 1);
    }

    #[test]
    fn uneven_split_rounds_up() {
        assert_eq!(plan(10, 3).results_count(), 4);
    }

    #[test]
    fn even_split_is_exact() {
        assert_eq!(plan(10_000_000, 10_000).results_count(), 1_000);
    }

    #[test]
    fn empty_input_has_no_chunks() {
        assert_eq!(plan(0, 7).results_count(), 0);
        assert_eq!(plan(0, 7).chunks().count(), 0);
    }

    #[test]
    fn chunk_larger_than_input() {
        let p = plan(5, 100);
        assert_eq!(p.results_count(), 1);
        assert_eq!(p.chunk(0), 0..5);
    }

    // ── chunk ranges ──────────────────────────────────────────────────────

    #[test]
    fn last_chunk_is_the_remainder() {
        let ranges: Vec<_> = plan(10, 3).chunks().collect();
        assert_eq!(ranges, vec![0..3, 3..6, 6..9, 9..10]);
    }

    #[test]
    fn chunks_cover_input_without_overlap() {
        for (len, chunk) in [(1, 1), (10, 3), (97, 8), (64, 64), (65, 64)] {
            let p = plan(len, chunk);
            let mut next = 0;
            for r in p.chunks() {
                assert_eq!(r.start, next);
                assert!(!r.is_empty());
                assert!(r.len() <= chunk);
                next = r.end;
            }
            assert_eq!(next, len);
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn chunk_past_end_panics() {
        plan(10, 3).chunk(4);
    }

    #[test]
    fn last_chunk_near_usize_max_does_not_overflow() {
        let p = plan(usize::MAX, usize::MAX - 1);
        assert_eq!(p.results_count(), 2);
        assert_eq!(p.chunk(0), 0..usize::MAX - 1);
        assert_eq!(p.chunk(1), usize::MAX - 1..usize::MAX);
    }

    // ── group_count ───────────────────────────────────────────────────────

    #[test]
    fn group_count_rounds_up_to_execution_width() {
        assert_eq!(plan(10_000_000, 10_000).group_count(nz(32)), 32); // 1000 / 32
        assert_eq!(plan(10, 3).group_count(nz(64)), 1);
        assert_eq!(plan(128, 1).group_count(nz(64)), 2);
        assert_eq!(plan(129, 1).group_count(nz(64)), 3);
        assert_eq!(plan(0, 1).group_count(nz(64)), 0);
    }

    // ── overflow ──────────────────────────────────────────────────────────

    #[test]
    fn default_sizes_do_not_overflow_a_chunk() {
        assert!(!plan(10_000_000, 10_000).partial_may_overflow(100));
    }

    #[test]
    fn huge_chunk_may_overflow() {
        assert!(plan(100_000_000, 100_000_000).partial_may_overflow(100));
    }
}
