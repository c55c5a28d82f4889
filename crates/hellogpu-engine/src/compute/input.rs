use std::num::NonZeroUsize;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_ELEMENT_COUNT: usize = 10_000_000;
pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = NonZeroUsize::new(10_000).unwrap();

/// Parameters of one reduction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReductionConfig {
    /// Number of input elements.
    pub element_count: usize,
    /// Elements summed by one worker.
    pub chunk_size: NonZeroUsize,
    /// Exclusive upper bound of the generated values; values are drawn from `[0, max_value)`.
    pub max_value: u32,
    /// Fixed RNG seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            element_count: DEFAULT_ELEMENT_COUNT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_value: 100,
            seed: None,
        }
    }
}

impl ReductionConfig {
    /// Generates the input array described by this config.
    pub fn generate_input(&self) -> Vec<i32> {
        random_input(self.element_count, self.max_value, self.seed)
    }
}

/// `len` values drawn independently and uniformly from `[0, max_value)`.
///
/// `max_value` is clamped to `[1, i32::MAX]`.
pub fn random_input(len: usize, max_value: u32, seed: Option<u64>) -> Vec<i32> {
    let upper = max_value.clamp(1, i32::MAX as u32) as i32;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    (0..len).map(|_| rng.gen_range(0..upper)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_stay_in_range() {
        let v = random_input(10_000, 100, Some(7));
        assert_eq!(v.len(), 10_000);
        assert!(v.iter().all(|&x| (0..100).contains(&x)));
    }

    #[test]
    fn same_seed_same_input() {
        assert_eq!(random_input(512, 100, Some(42)), random_input(512, 100, Some(42)));
    }

    #[test]
    fn zero_bound_yields_zeros() {
        assert!(random_input(16, 0, Some(1)).iter().all(|&x| x == 0));
    }

    #[test]
    fn default_config_matches_demo_sizes() {
        let cfg = ReductionConfig::default();
        assert_eq!(cfg.element_count, 10_000_000);
        assert_eq!(cfg.chunk_size.get(), 10_000);
        assert_eq!(cfg.max_value, 100);
    }
}
