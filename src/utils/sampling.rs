//! Seeded random helpers.
//!
//! Every function takes its seed explicitly so that two calls with the same
//! arguments return the same output regardless of what ran before.

use crate::error::{BenchError, Result};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generate `n` hex colours (`#rrggbb`) from a seeded generator
pub fn random_colors(n: usize, seed: u64) -> Vec<String> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| format!("#{:06x}", rng.gen_range(0..=0xFF_FFFFu32)))
        .collect()
}

/// Draw `fraction` of `items` without replacement (at least one item when non-empty)
pub fn random_sample<T: Clone>(items: &[T], fraction: f64, seed: u64) -> Result<Vec<T>> {
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(BenchError::invalid_parameter(
            "fraction",
            fraction,
            "must be in (0, 1]",
        ));
    }
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let n = ((items.len() as f64 * fraction) as usize).max(1);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Ok(items.choose_multiple(&mut rng, n).cloned().collect())
}
