//! Host-side reduction steps.
//!
//! Totals are accumulated in 64 bits. Partial sums stay 32-bit, which is the
//! width the device kernel writes.

/// Sums one chunk the way a device lane does: 32-bit, wrapping on overflow.
#[inline]
pub fn chunk_sum(chunk: &[i32]) -> i32 {
    chunk.iter().fold(0i32, |acc, &v| acc.wrapping_add(v))
}

/// Combines partial sums into the final scalar, sequentially in index order.
#[inline]
pub fn finalize(partials: &[i32]) -> i64 {
    partials.iter().map(|&p| i64::from(p)).sum()
}

/// Host-only reference reduction over the whole input, single-threaded.
#[inline]
pub fn sequential_sum(input: &[i32]) -> i64 {
    input.iter().map(|&v| i64::from(v)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sums_are_zero() {
        assert_eq!(chunk_sum(&[]), 0);
        assert_eq!(finalize(&[]), 0);
        assert_eq!(sequential_sum(&[]), 0);
    }

    #[test]
    fn chunk_sum_wraps_like_the_device() {
        assert_eq!(chunk_sum(&[i32::MAX, 1]), i32::MIN);
    }

    #[test]
    fn totals_do_not_wrap() {
        let partials = [i32::MAX, i32::MAX, 2];
        assert_eq!(finalize(&partials), 2 * i32::MAX as i64 + 2);
        assert_eq!(sequential_sum(&partials), 2 * i32::MAX as i64 + 2);
    }
}
