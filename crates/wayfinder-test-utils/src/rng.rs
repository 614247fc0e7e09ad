//! Deterministic RNG utilities for reproducible tests.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Create a deterministic `ChaCha8Rng` from a seed.
///
/// All test randomization should go through this to ensure reproducibility.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// `len` action indices drawn uniformly from `[0, n_actions)`.
pub fn random_action_indices(len: usize, n_actions: usize, seed: u64) -> Vec<usize> {
    let mut rng = seeded_rng(seed);
    (0..len).map(|_| rng.random_range(0..n_actions)).collect()
}

/// `len` distance readings in `[0, max)`.
pub fn random_distances(len: usize, max: f64, seed: u64) -> Vec<f64> {
    let mut rng = seeded_rng(seed);
    (0..len).map(|_| rng.random_range(0.0..max)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
