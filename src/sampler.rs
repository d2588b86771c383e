// src/sampler.rs
//! Bounded random sampling over the top of the fetched ranking.
//!
//! The digest deliberately draws from the top-`pool_size` slice instead of
//! always reporting the top `count`. Rank in the rendered digest follows
//! draw order, so presentation varies run to run.

use rand::Rng;

use crate::fetch::types::RepoCandidate;

/// Draw up to `count` distinct candidates, uniformly at random and without
/// replacement, from the first `pool_size` fetched candidates.
///
/// Effective bounds: `min(pool_size, |candidates|)` items are eligible, and
/// `min(eligible, count)` are drawn. An empty pool yields an empty draw.
pub fn sample_candidates<R: Rng + ?Sized>(
    candidates: &[RepoCandidate],
    pool_size: usize,
    count: usize,
    rng: &mut R,
) -> Vec<RepoCandidate> {
    let effective_pool = pool_size.min(candidates.len());
    let effective_sample = effective_pool.min(count);
    if effective_sample == 0 {
        return Vec::new();
    }

    rand::seq::index::sample(rng, effective_pool, effective_sample)
        .into_iter()
        .map(|i| candidates[i].clone())
        .collect()
}
