//! # Generator Configuration
//!
//! Knobs shared by every category generator: the retry bound and an
//! optional seed. With a seed, each instance in a batch draws from its own
//! RNG derived from `(seed, index)`, so a single problem can be regenerated
//! without replaying the ones before it.
//!
//! ## Example
//!
//! ```rust
//! use rand::Rng;
//! use trig_core::config::GeneratorConfig;
//!
//! let config = GeneratorConfig::seeded(42);
//! let a: u32 = config.rng_for(7).gen();
//! let b: u32 = config.rng_for(7).gen();
//! assert_eq!(a, b);
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Default bound on sampling attempts per instance
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// Environment variable consulted by the CLI for a default seed
pub const SEED_ENV_VAR: &str = "TRIGSHEET_SEED";

/// Settings for the generate → solve → narrate pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Base seed; `None` draws fresh entropy for every instance
    #[serde(default)]
    pub seed: Option<u64>,

    /// Sampling attempts before giving up with `GenerationExhausted`
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            seed: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl GeneratorConfig {
    pub fn seeded(seed: u64) -> Self {
        GeneratorConfig {
            seed: Some(seed),
            ..GeneratorConfig::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// RNG for the `index`-th instance of a batch
    pub fn rng_for(&self, index: u64) -> StdRng {
        match self.seed {
            Some(seed) => ReplayToken::new(seed, index).rng(),
            None => StdRng::from_entropy(),
        }
    }
}

// =============================================================================
// Replay tokens
// =============================================================================

/// Identifies one instance's random stream: `(seed, index)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn new(seed: u64, index: u64) -> Self {
        ReplayToken { seed, index }
    }

    /// Mixed 64-bit key; neighbouring indices give unrelated streams
    pub fn key(&self) -> u64 {
        mix(self.seed ^ mix(self.index.wrapping_add(0x9e37_79b9_7f4a_7c15)))
    }

    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.key())
    }
}

/// SplitMix64 finalizer
fn mix(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.seed, None);
        assert_eq!(config.max_attempts, DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let config = GeneratorConfig::seeded(2024);
        let first: Vec<u64> = (0..4).map(|i| config.rng_for(i).gen()).collect();
        let second: Vec<u64> = (0..4).map(|i| config.rng_for(i).gen()).collect();
        assert_eq!(first, second);
        // distinct indices give distinct streams
        assert_ne!(first[0], first[1]);
    }

    #[test]
    fn test_tokens_differ_by_seed() {
        assert_ne!(ReplayToken::new(1, 0).key(), ReplayToken::new(2, 0).key());
        assert_ne!(ReplayToken::new(1, 0).key(), ReplayToken::new(1, 1).key());
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: GeneratorConfig = serde_json::from_str("{\"seed\": 5}").unwrap();
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.max_attempts, DEFAULT_MAX_ATTEMPTS);
    }
}
