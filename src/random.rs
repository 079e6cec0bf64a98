//! Random number generator construction and stream derivation.
//!
//! Every [`Marginal`](crate::Marginal) owns its own generator. This module
//! builds those generators and derives the per-dimension seeds used when a
//! whole [`ProbabilisticInput`](crate::ProbabilisticInput) is reseeded.
//!
//! # Reproducibility
//!
//! For reproducible experiments, use [`create_rng`] with a fixed seed.
//! The underlying algorithm (SmallRng) is deterministic for a given seed
//! on the same platform.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Creates a fast, seeded random number generator.
///
/// Uses `SmallRng` (Xoshiro256++) for high performance.
/// The sequence is deterministic for a given seed on the same platform.
///
/// # Examples
/// ```
/// use uqtestfuns::random::create_rng;
/// use rand::Rng;
/// let mut rng = create_rng(42);
/// let x: f64 = rng.random();
/// assert!(x >= 0.0 && x < 1.0);
/// ```
pub fn create_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Creates a generator seeded from operating-system entropy.
///
/// The seed is drawn first and returned alongside the generator so the
/// stream can be replayed later through [`create_rng`].
pub fn create_entropy_rng() -> (SmallRng, u64) {
    let seed = entropy_seed();
    (create_rng(seed), seed)
}

/// Draws a fresh 64-bit seed from the thread-local entropy-backed generator.
pub fn entropy_seed() -> u64 {
    rand::rng().random()
}

/// Derives the seed of stream `index` from a master `seed`.
///
/// # Algorithm
/// The master seed and the stream index are each passed through the
/// SplitMix64 finalizer and combined, then finalized once more. Distinct
/// indices therefore land on unrelated seeds even for adjacent master
/// seeds, and stream `i` can be rebuilt without drawing streams `0..i`.
///
/// Reference: Steele, Lea & Flood (2014), "Fast Splittable Pseudorandom
/// Number Generators", *OOPSLA*.
///
/// # Examples
/// ```
/// use uqtestfuns::random::derive_seed;
/// assert_eq!(derive_seed(7, 3), derive_seed(7, 3));
/// assert_ne!(derive_seed(7, 0), derive_seed(7, 1));
/// ```
pub fn derive_seed(seed: u64, index: u64) -> u64 {
    splitmix64(splitmix64(seed) ^ splitmix64(index.wrapping_add(0x9E37_79B9_7F4A_7C15)))
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Draws a value uniformly from the open interval (0, 1).
///
/// Zero and one are excluded so that quantile functions of unbounded
/// distributions never return the infinite bound of the support. A finite
/// quantile can still overflow `f64` (a lognormal with a very large
/// `sigma`), in which case the draw is `+∞`.
pub fn open_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.sample(rand::distr::Open01)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(42);
        let vals1: Vec<f64> = (0..10).map(|_| rng1.random()).collect();
        let vals2: Vec<f64> = (0..10).map(|_| rng2.random()).collect();
        assert_eq!(vals1, vals2);
    }

    #[test]
    fn test_entropy_rng_replays_from_seed() {
        let (mut rng, seed) = create_entropy_rng();
        let mut replay = create_rng(seed);
        let a: Vec<u64> = (0..5).map(|_| rng.random()).collect();
        let b: Vec<u64> = (0..5).map(|_| replay.random()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_derive_seed_distinct_streams() {
        let seeds: Vec<u64> = (0..100).map(|i| derive_seed(2024, i)).collect();
        let mut sorted = seeds.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), seeds.len());
    }

    #[test]
    fn test_derive_seed_depends_on_master() {
        assert_ne!(derive_seed(1, 0), derive_seed(2, 0));
        assert_ne!(derive_seed(0, 0), 0);
    }

    #[test]
    fn test_open_unit_excludes_endpoints() {
        let mut rng = create_rng(7);
        for _ in 0..10_000 {
            let u = open_unit(&mut rng);
            assert!(u > 0.0 && u < 1.0);
        }
    }
}
