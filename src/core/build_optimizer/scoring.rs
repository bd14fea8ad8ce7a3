//! Candidate scoring.
//!
//! Weight-directed mode scores against the build goal's thresholds and the
//! combined priorities. Target-directed mode scores against the request's
//! explicit targets. Health and Faith floors apply in both.

use super::attributes::{Allocation, AttributeKey};
use super::catalog::{faith_for_summons, pool_for_summons};
use super::request::OptimizationMode;
use super::scaling::{ScaledStats, APTITUDE_STEP};
use super::space::SearchSpace;

/// Score `allocation`; higher is better.
pub fn score(space: &SearchSpace<'_>, allocation: &Allocation) -> f64 {
    let stats = space.evaluate(allocation);
    score_with_stats(space, allocation, &stats)
}

/// Score with stats that were already resolved for `allocation`.
pub fn score_with_stats(space: &SearchSpace<'_>, allocation: &Allocation, stats: &ScaledStats) -> f64 {
    let mode_score = match space.request.mode {
        OptimizationMode::WeightDirected => weight_directed(space, allocation, stats),
        OptimizationMode::TargetDirected => target_directed(space, allocation, stats),
    };
    mode_score + hard_constraints(space, allocation, stats)
}

fn weight_directed(space: &SearchSpace<'_>, allocation: &Allocation, stats: &ScaledStats) -> f64 {
    let weights = &space.params.scoring;
    let mut total = 0.0;

    for (&key, threshold) in &space.goal.thresholds {
        let value = stats.get(key);

        if let Some(minimum) = threshold.minimum {
            if value >= minimum {
                total += weights.threshold_met;
            } else {
                total -= gap(minimum, value) * weights.threshold_shortfall;
            }
        }

        if let Some(ideal) = threshold.ideal {
            total += weights.ideal_bonus / (1.0 + gap(value, ideal).abs());
        }

        if let Some(maximum) = threshold.maximum {
            if value > maximum {
                total -= gap(value, maximum) * weights.overshoot;
            }
        }
    }

    for (key, points) in allocation.iter() {
        total += f64::from(points) * space.priorities.of(key) * weights.priority_factor;
    }

    if let Some(summons) = space.request.constraints.summon_goal.filter(|n| *n > 0) {
        let faith_ok = stats.get(AttributeKey::Fai) >= faith_for_summons(summons);
        let pool_ok = space.resource_pool(stats) >= pool_for_summons(summons);
        if faith_ok && pool_ok {
            total += weights.summon_bonus;
        }
    }

    total -= f64::from(aptitude_waste(allocation, stats)) * weights.aptitude_waste;
    total -= f64::from(space.unspent(allocation)) * weights.unused_point;

    total
}

fn target_directed(space: &SearchSpace<'_>, allocation: &Allocation, stats: &ScaledStats) -> f64 {
    let weights = &space.params.scoring;
    let mut total = 0.0;

    for (&key, &target) in &space.request.targets {
        let value = stats.get(key);
        if value >= target {
            total += weights.target_met;
        } else {
            total -= gap(target, value) * weights.target_shortfall;
        }
    }

    let spent = allocation.total();
    if spent > space.budget {
        total -= f64::from(spent - space.budget) * weights.budget_overflow;
    }

    total
}

fn hard_constraints(space: &SearchSpace<'_>, allocation: &Allocation, stats: &ScaledStats) -> f64 {
    let weights = &space.params.scoring;
    let mut total = 0.0;

    if let Some(min_health) = space.request.constraints.min_health {
        let health = space.health(stats);
        if health < min_health {
            total -= weights.health_floor_penalty
                + gap(min_health, health) * weights.health_shortfall;
        }
    }

    if let Some(faith_floor) = space.floors.faith_floor {
        if allocation.get(AttributeKey::Fai) < faith_floor {
            total -= weights.faith_floor_penalty;
        }
    }

    total
}

/// `a - b` without i32 overflow on extreme request values.
#[inline]
fn gap(a: i32, b: i32) -> f64 {
    f64::from(a) - f64::from(b)
}

/// Scaled Aptitude past the last multiple of 6, counted only when points
/// were invested in Aptitude.
pub fn aptitude_waste(allocation: &Allocation, stats: &ScaledStats) -> i32 {
    if allocation.get(AttributeKey::Apt) == 0 {
        return 0;
    }
    stats.get(AttributeKey::Apt).max(0) % APTITUDE_STEP
}
