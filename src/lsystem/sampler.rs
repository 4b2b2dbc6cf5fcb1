//! Seeded weighted sampling
//!
//!     Stochastic productions pick an alternative through a [Sampler]. A sampler must be a pure
//!     function of `(seed, weights)`: no hidden state, the same answer on every call and every
//!     platform. The engine derives the seed from the rewritten symbol and its position, so a
//!     given axiom always rewrites the same way.
//!
//!     [SeededSampler] hashes the seed string with FNV-1a, seeds a ChaCha8 generator with the
//!     hash and draws once from a [WeightedIndex]. ChaCha output is specified bit for bit, which
//!     keeps results identical across platforms.

use crate::lsystem::error::SampleError;
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// Picks an index into `weights`, deterministically for a given seed
pub trait Sampler: Send + Sync {
    fn sample(&self, seed: &str, weights: &[f64]) -> Result<usize, SampleError>;
}

/// The default sampler
#[derive(Debug, Clone, Copy, Default)]
pub struct SeededSampler;

impl SeededSampler {
    pub fn new() -> Self {
        SeededSampler
    }
}

fn fnv1a(seed: &str) -> u64 {
    seed.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

impl Sampler for SeededSampler {
    fn sample(&self, seed: &str, weights: &[f64]) -> Result<usize, SampleError> {
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(SampleError::InvalidWeight(*bad));
        }
        let distribution = WeightedIndex::new(weights).map_err(|e| match e {
            WeightedError::NoItem => SampleError::Empty,
            _ => SampleError::NonPositiveTotal,
        })?;
        let mut rng = ChaCha8Rng::seed_from_u64(fnv1a(seed));
        Ok(distribution.sample(&mut rng))
    }
}

/// The seed used for an occurrence of `symbol` at `index`
pub fn occurrence_seed(symbol: &str, index: usize) -> String {
    format!("{}-{}", symbol, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a(""), 0xcbf29ce484222325);
        assert_eq!(fnv1a("a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn test_same_seed_same_index() {
        let sampler = SeededSampler::new();
        let weights = [1.0, 2.0, 3.0, 4.0];
        let first = sampler.sample("F-12", &weights).unwrap();
        for _ in 0..20 {
            assert_eq!(sampler.sample("F-12", &weights).unwrap(), first);
        }
    }

    #[test]
    fn test_zero_weight_never_chosen() {
        let sampler = SeededSampler::new();
        for index in 0..200 {
            let seed = occurrence_seed("A", index);
            assert_eq!(sampler.sample(&seed, &[0.0, 1.0]).unwrap(), 1);
        }
    }

    #[test]
    fn test_invalid_weights() {
        let sampler = SeededSampler::new();
        assert_eq!(sampler.sample("A-0", &[]), Err(SampleError::Empty));
        assert_eq!(
            sampler.sample("A-0", &[0.0, 0.0]),
            Err(SampleError::NonPositiveTotal)
        );
        assert_eq!(
            sampler.sample("A-0", &[1.0, -2.0]),
            Err(SampleError::InvalidWeight(-2.0))
        );
        assert!(matches!(
            sampler.sample("A-0", &[f64::NAN]),
            Err(SampleError::InvalidWeight(_))
        ));
    }

    #[test]
    fn test_frequencies_follow_weights() {
        let sampler = SeededSampler::new();
        let draws = 20_000;
        let heavy = (0..draws)
            .filter(|i| sampler.sample(&occurrence_seed("A", *i), &[1.0, 3.0]).unwrap() == 1)
            .count();
        let ratio = heavy as f64 / draws as f64;
        assert!((ratio - 0.75).abs() < 0.02, "ratio was {}", ratio);
    }

    #[test]
    fn test_occurrence_seed_format() {
        assert_eq!(occurrence_seed("F", 3), "F-3");
    }
}
