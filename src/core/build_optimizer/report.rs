//! Finalize: turn the best candidate into an [`OptimizationResult`] with a
//! human-readable trace.
//!
//! Reasoning and warnings are diagnostic strings only; nothing downstream
//! parses them.

use super::attributes::{AttributeKey, Allocation};
use super::catalog::{faith_for_summons, pool_for_summons};
use super::evolve::EvolutionOutcome;
use super::request::OptimizationMode;
use super::scaling::{ScaledStats, APTITUDE_STEP};
use super::scoring::aptitude_waste;
use super::space::SearchSpace;
use super::OptimizationResult;

/// Compatibility scores below this trigger a warning.
pub const LOW_COMPATIBILITY: u8 = 4;

/// Assemble the result for the best candidate of a run.
pub fn finalize(space: &SearchSpace<'_>, outcome: EvolutionOutcome) -> OptimizationResult {
    let allocation = outcome.best.allocation;
    let stats = space.evaluate(&allocation);
    let health = space.health(&stats);
    let resource_pool = space.resource_pool(&stats);

    let mut reasoning = Vec::new();
    let mut warnings = space.floors.warnings.clone();

    describe_run(space, &allocation, &outcome, &mut reasoning);
    match space.request.mode {
        OptimizationMode::WeightDirected => {
            describe_thresholds(space, &stats, &mut reasoning, &mut warnings)
        }
        OptimizationMode::TargetDirected => {
            describe_targets(space, &stats, &mut reasoning, &mut warnings)
        }
    }
    describe_aptitude(&allocation, &stats, &mut reasoning, &mut warnings);
    describe_custom_weights(space, &mut reasoning);
    describe_constraints(space, &allocation, &stats, health, resource_pool, &mut reasoning, &mut warnings);
    describe_compatibility(space, &mut warnings);

    tracing::info!(
        goal = %space.goal.id,
        score = outcome.best.score,
        points = allocation.total(),
        generations = outcome.generations,
        warnings = warnings.len(),
        "optimization finished"
    );

    OptimizationResult {
        allocation,
        total_points: allocation.total(),
        score: outcome.best.score,
        stats,
        health,
        resource_pool,
        generations: outcome.generations,
        stopped_early: outcome.stopped_early,
        reasoning,
        warnings,
    }
}

fn describe_run(
    space: &SearchSpace<'_>,
    allocation: &Allocation,
    outcome: &EvolutionOutcome,
    reasoning: &mut Vec<String>,
) {
    let request = space.request;
    reasoning.push(format!(
        "Build goal '{}' ({}) at level {}: {} of {} points spent",
        space.goal.name,
        space.goal.id,
        request.level,
        allocation.total(),
        space.budget
    ));

    if request.is_monoclass() {
        reasoning.push(format!(
            "Monoclass {}: class bonuses amplified",
            request.main_class
        ));
    } else {
        reasoning.push(format!(
            "Classes {} / {}",
            request.main_class, request.sub_class
        ));
    }

    if let Some(percent) = request.bonuses.percent.filter(|p| p.units > 0) {
        reasoning.push(format!(
            "Percent bonus active on STR and WIL ({} units)",
            percent.units
        ));
    }

    let top: Vec<String> = space
        .priorities
        .ranked()
        .into_iter()
        .take(3)
        .map(|key| format!("{} ({:.1})", key, space.priorities.of(key)))
        .collect();
    reasoning.push(format!("Top priorities: {}", top.join(", ")));

    let ending = if outcome.stopped_early {
        "stopped early after no improvement"
    } else {
        "reached the generation cap"
    };
    reasoning.push(format!(
        "Search ran {} generations and {}",
        outcome.generations, ending
    ));
}

fn describe_thresholds(
    space: &SearchSpace<'_>,
    stats: &ScaledStats,
    reasoning: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    for (&key, threshold) in &space.goal.thresholds {
        let value = stats.get(key);

        if let Some(minimum) = threshold.minimum {
            if value >= minimum {
                reasoning.push(format!("{} {} meets minimum {}", key, value, minimum));
            } else {
                warnings.push(format!("{} {} is below minimum {}", key, value, minimum));
            }
        }

        if let Some(ideal) = threshold.ideal {
            if value >= ideal {
                reasoning.push(format!("{} {} reaches ideal {}", key, value, ideal));
            }
        }

        if let Some(maximum) = threshold.maximum {
            if value > maximum {
                warnings.push(format!("{} {} exceeds maximum {}", key, value, maximum));
            }
        }
    }
}

fn describe_targets(
    space: &SearchSpace<'_>,
    stats: &ScaledStats,
    reasoning: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    for (&key, &target) in &space.request.targets {
        let value = stats.get(key);
        if value >= target {
            reasoning.push(format!("{} {} meets target {}", key, value, target));
        } else {
            let shortfall = i64::from(target) - i64::from(value);
            warnings.push(format!("{} {} misses target {} by {}", key, value, target, shortfall));
        }
    }
}

fn describe_aptitude(
    allocation: &Allocation,
    stats: &ScaledStats,
    reasoning: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let aptitude = stats.get(AttributeKey::Apt);
    if aptitude <= 0 {
        return;
    }

    let useful = aptitude - aptitude % APTITUDE_STEP;
    let ratio = f64::from(useful) / f64::from(aptitude) * 100.0;
    reasoning.push(format!(
        "Aptitude {} grants +{} to every other attribute ({:.0}% efficiency)",
        aptitude, stats.aptitude_bonus, ratio
    ));

    let waste = aptitude_waste(allocation, stats);
    if waste > 0 {
        warnings.push(format!(
            "Aptitude {} is not a multiple of {}: {} points are wasted",
            aptitude, APTITUDE_STEP, waste
        ));
    }
}

fn describe_custom_weights(space: &SearchSpace<'_>, reasoning: &mut Vec<String>) {
    for (weight, value) in space.request.active_sliders() {
        let favored: Vec<&str> = weight
            .contributions()
            .iter()
            .map(|(key, _)| key.abbreviation())
            .collect();
        reasoning.push(format!(
            "Custom weight '{}' at {}/10 favors {}",
            weight,
            value,
            favored.join(", ")
        ));
    }
}

fn describe_constraints(
    space: &SearchSpace<'_>,
    allocation: &Allocation,
    stats: &ScaledStats,
    health: i32,
    resource_pool: i32,
    reasoning: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let constraints = &space.request.constraints;

    if let Some(min_health) = constraints.min_health {
        if health >= min_health {
            reasoning.push(format!("Health {} meets minimum {}", health, min_health));
        } else {
            warnings.push(format!("Health {} is below minimum {}", health, min_health));
        }
    }

    if let Some(summons) = constraints.summon_goal.filter(|n| *n > 0) {
        let faith = stats.get(AttributeKey::Fai);
        let needed_faith = faith_for_summons(summons);
        let needed_pool = pool_for_summons(summons);
        if faith >= needed_faith && resource_pool >= needed_pool {
            reasoning.push(format!(
                "Summon goal of {} supported (FAI {}, resource pool {})",
                summons, faith, resource_pool
            ));
        } else {
            warnings.push(format!(
                "Summon goal of {} not supported: FAI {}/{}, resource pool {}/{}",
                summons, faith, needed_faith, resource_pool, needed_pool
            ));
        }
    }

    if let Some(floor) = space.floors.faith_floor {
        if allocation.get(AttributeKey::Fai) < floor {
            warnings.push(format!(
                "Faith investment {} is below the summon floor of {}",
                allocation.get(AttributeKey::Fai),
                floor
            ));
        }
    }

    if let Some(target) = space.request.multiclass_aptitude_target() {
        let aptitude = stats.get(AttributeKey::Apt);
        if aptitude == target {
            reasoning.push(format!("Aptitude held at multiclass target {}", target));
        } else {
            warnings.push(format!(
                "Aptitude {} differs from multiclass target {}",
                aptitude, target
            ));
        }
    }
}

fn describe_compatibility(space: &SearchSpace<'_>, warnings: &mut Vec<String>) {
    let request = space.request;
    let mut classes = vec![request.main_class.as_str()];
    if !request.is_monoclass() {
        classes.push(request.sub_class.as_str());
    }

    for class in classes {
        if let Some(score) = space.goal.compatibility_with(class) {
            if score < LOW_COMPATIBILITY {
                warnings.push(format!(
                    "{} has low compatibility ({}/10) with the {} build",
                    class, score, space.goal.name
                ));
            }
        }
    }
}
