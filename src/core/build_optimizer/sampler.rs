//! Constrained random candidates.
//!
//! Points are dropped one at a time on uniformly chosen attributes until the
//! budget runs out. Increments whose marginal efficiency is poor are usually
//! skipped, which keeps candidates plausible without making them
//! deterministic.

use rand::Rng;

use super::attributes::{Allocation, AttributeKey};
use super::space::SearchSpace;

/// Consecutive skips after which the next increment is taken regardless.
const MAX_CONSECUTIVE_SKIPS: u32 = 256;

/// Draw one random allocation that starts from the floors and spends the
/// whole budget (unless every attribute is capped).
pub fn random_candidate<R: Rng + ?Sized>(space: &SearchSpace<'_>, rng: &mut R) -> Allocation {
    let params = space.params;
    let skip_bias = params.random_skip_bias.clamp(0.0, 1.0);

    let mut allocation = space.floors.base_allocation();
    let mut open: Vec<AttributeKey> = AttributeKey::ALL
        .into_iter()
        .filter(|&key| space.can_grow(&allocation, key))
        .collect();
    let mut bonus = space.aptitude_bonus(&allocation);
    let mut skips = 0;

    while space.unspent(&allocation) > 0 && !open.is_empty() {
        let slot = rng.gen_range(0..open.len());
        let key = open[slot];

        if !space.can_grow(&allocation, key) {
            open.swap_remove(slot);
            continue;
        }

        let gain = space.gain(&allocation, key, bonus);
        if gain < params.random_efficiency_floor
            && skips < MAX_CONSECUTIVE_SKIPS
            && rng.gen_bool(skip_bias)
        {
            skips += 1;
            continue;
        }

        skips = 0;
        allocation.increment(key);
        if key.is_aptitude() {
            bonus = space.aptitude_bonus(&allocation);
        }
    }

    allocation
}
