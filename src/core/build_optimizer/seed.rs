//! Priority-driven greedy seed.
//!
//! Starting from the hard-constraint floors:
//!
//! 1. **Minimums**: invest just enough for each declared minimum (the
//!    request's targets in target-directed mode).
//! 2. **Ideals**: keep investing toward each ideal while a point still
//!    returns at least half its face value.
//! 3. **Remainder**: spend what is left by descending priority behind an
//!    efficiency gate that relaxes 0.4 -> 0.2 -> none, so the whole budget
//!    is always spent.
//!
//! Aptitude only moves in whole steps to the next multiple of 6 and is
//! resolved before the other attributes in every pass.

use super::attributes::{Allocation, AttributeKey};
use super::request::OptimizationMode;
use super::scaling::APTITUDE_STEP;
use super::space::SearchSpace;

/// Efficiency a point must keep while chasing an ideal value.
pub const IDEAL_EFFICIENCY_FLOOR: f64 = 0.5;

/// Relaxing efficiency gates for the remainder pass.
pub const REMAINDER_EFFICIENCY_GATES: [f64; 2] = [0.4, 0.2];

/// Build the greedy seed candidate.
pub fn greedy_seed(space: &SearchSpace<'_>) -> Allocation {
    let mut allocation = space.floors.base_allocation();
    let ranked = ranked_without_aptitude(space);

    fill_minimums(space, &mut allocation, &ranked);
    fill_ideals(space, &mut allocation, &ranked);
    fill_remainder(space, &mut allocation, &ranked);

    tracing::debug!(
        total = allocation.total(),
        budget = space.budget,
        "greedy seed built"
    );
    allocation
}

fn ranked_without_aptitude(space: &SearchSpace<'_>) -> Vec<AttributeKey> {
    space
        .priorities
        .ranked()
        .into_iter()
        .filter(|key| !key.is_aptitude())
        .collect()
}

/// Pass 1.
pub fn fill_minimums(space: &SearchSpace<'_>, allocation: &mut Allocation, ranked: &[AttributeKey]) {
    if let Some(minimum) = declared_minimum(space, AttributeKey::Apt) {
        step_aptitude_toward(space, allocation, minimum);
    }

    for &key in ranked {
        let Some(minimum) = declared_minimum(space, key) else {
            continue;
        };
        if space.floors.is_fixed(key) {
            continue;
        }

        let bonus = space.aptitude_bonus(allocation);
        let current = allocation.get(key);
        let Some(points) = space.context.points_to_reach(key, minimum, current, bonus) else {
            continue;
        };
        if points <= space.cap(key) && points - current <= space.unspent(allocation) {
            allocation.set(key, points);
        }
    }
}

/// Value pass 1 must reach for `key`: the request's target in
/// target-directed mode, the goal's minimum threshold otherwise.
fn declared_minimum(space: &SearchSpace<'_>, key: AttributeKey) -> Option<i32> {
    match space.request.mode {
        OptimizationMode::TargetDirected => space.request.targets.get(&key).copied(),
        OptimizationMode::WeightDirected => space.goal.threshold(key).and_then(|t| t.minimum),
    }
}

/// Pass 2.
pub fn fill_ideals(space: &SearchSpace<'_>, allocation: &mut Allocation, ranked: &[AttributeKey]) {
    if let Some(ideal) = space.goal.threshold(AttributeKey::Apt).and_then(|t| t.ideal) {
        step_aptitude_toward(space, allocation, ideal);
    }

    let bonus = space.aptitude_bonus(allocation);
    for &key in ranked {
        let Some(ideal) = space.goal.threshold(key).and_then(|t| t.ideal) else {
            continue;
        };

        while space.unspent(allocation) > 0
            && space.can_grow(allocation, key)
            && space.scaled(allocation, key, bonus) < ideal
            && space.gain(allocation, key, bonus) >= IDEAL_EFFICIENCY_FLOOR
        {
            allocation.increment(key);
        }
    }
}

/// Pass 3.
pub fn fill_remainder(space: &SearchSpace<'_>, allocation: &mut Allocation, ranked: &[AttributeKey]) {
    let bonus = space.aptitude_bonus(allocation);

    for gate in REMAINDER_EFFICIENCY_GATES {
        while space.unspent(allocation) > 0 {
            let next = ranked.iter().copied().find(|&key| {
                space.priorities.of(key) > 0.0
                    && space.can_grow(allocation, key)
                    && !at_maximum(space, allocation, key, bonus)
                    && space.gain(allocation, key, bonus) >= gate
            });
            match next {
                Some(key) => allocation.increment(key),
                None => break,
            }
        }
    }

    while space.unspent(allocation) > 0 {
        match dump_target(space, allocation, ranked, bonus) {
            Some(AttributeKey::Apt) => dump_into_aptitude(space, allocation),
            Some(key) => allocation.increment(key),
            None => break,
        }
    }
}

/// Spend leftovers on Aptitude once every other attribute is capped.
///
/// Whole steps come first. A leftover too small for another step goes in one
/// point at a time, the only way the seed ends on a partial Aptitude step.
fn dump_into_aptitude(space: &SearchSpace<'_>, allocation: &mut Allocation) {
    let key = AttributeKey::Apt;
    let before = allocation.get(key);
    let next_step = round_up_to_step(space.context.resolve_aptitude(allocation).saturating_add(1));
    step_aptitude_toward(space, allocation, next_step);
    if allocation.get(key) == before {
        allocation.increment(key);
    }
}

/// Highest-priority attribute with room left, preferring ones still under
/// their maximum and then the most headroom. Aptitude only as a last resort.
fn dump_target(
    space: &SearchSpace<'_>,
    allocation: &Allocation,
    ranked: &[AttributeKey],
    bonus: i32,
) -> Option<AttributeKey> {
    // Reversed so `max_by` (last maximum wins) settles ties on ranking order.
    ranked
        .iter()
        .rev()
        .copied()
        .filter(|&key| space.can_grow(allocation, key))
        .max_by(|&a, &b| {
            let key_of = |key: AttributeKey| {
                (
                    !at_maximum(space, allocation, key, bonus),
                    space.priorities.of(key),
                    space.cap(key) - allocation.get(key),
                )
            };
            let (a_open, a_priority, a_room) = key_of(a);
            let (b_open, b_priority, b_room) = key_of(b);
            a_open
                .cmp(&b_open)
                .then(a_priority.total_cmp(&b_priority))
                .then(a_room.cmp(&b_room))
        })
        .or_else(|| {
            space
                .can_grow(allocation, AttributeKey::Apt)
                .then_some(AttributeKey::Apt)
        })
}

fn at_maximum(space: &SearchSpace<'_>, allocation: &Allocation, key: AttributeKey, bonus: i32) -> bool {
    space
        .goal
        .threshold(key)
        .and_then(|t| t.maximum)
        .is_some_and(|maximum| space.scaled(allocation, key, bonus) >= maximum)
}

/// Invest Aptitude to the smallest multiple of 6 at or above `target`, or the
/// largest affordable multiple below it. Never leaves a partial step.
///
/// Targets past what the cap allows are pulled down to the reachable maximum.
pub fn step_aptitude_toward(space: &SearchSpace<'_>, allocation: &mut Allocation, target: i32) {
    let key = AttributeKey::Apt;
    if !space.can_grow(allocation, key) {
        return;
    }

    let current_points = allocation.get(key);
    let current_value = space.context.scaled_value(key, current_points, 0);
    let limit = space.cap(key).min(current_points + space.unspent(allocation));
    let target = target.min(space.context.max_value(key, 0));

    let mut step_value = round_up_to_step(target);
    while step_value > current_value {
        if let Some(points) = space.context.points_to_reach(key, step_value, current_points, 0) {
            if points <= limit {
                allocation.set(key, points);
                return;
            }
        }
        step_value -= APTITUDE_STEP;
    }
}

/// Smallest multiple of the Aptitude step at or above `value`.
pub fn round_up_to_step(value: i32) -> i32 {
    let steps = value.max(0).saturating_add(APTITUDE_STEP - 1) / APTITUDE_STEP;
    steps.saturating_mul(APTITUDE_STEP)
}
