//! Population-based refinement.
//!
//! Each generation is scored and sorted; the top share survives unchanged,
//! the next share is produced by mutating survivors, and the rest is refilled
//! with fresh random candidates. The best candidate ever seen is tracked
//! across generations.
//!
//! ```text
//! seed + randoms -> [score -> sort -> elites | mutants | randoms] x N -> best
//! ```

use rand::Rng;
use std::cmp::Ordering;

use super::attributes::{Allocation, AttributeKey};
use super::sampler::random_candidate;
use super::scoring::score;
use super::space::SearchSpace;

/// A scored allocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub allocation: Allocation,
    pub score: f64,
}

impl Candidate {
    pub fn scored(space: &SearchSpace<'_>, allocation: Allocation) -> Self {
        Self {
            score: score(space, &allocation),
            allocation,
        }
    }
}

/// Result of the evolutionary loop.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionOutcome {
    pub best: Candidate,
    /// Generations actually run.
    pub generations: usize,
    /// The stagnation window ended the run before the generation cap.
    pub stopped_early: bool,
}

// ============================================================================
// Repair & mutation
// ============================================================================

/// Clamp `allocation` into its floors and caps, then move single points
/// until it spends exactly the budget.
///
/// Excess points come out of the attribute that loses the least efficiency;
/// missing points go to the attribute that gains the most. Ties go to the
/// lower-priority attribute on removal and the higher-priority one on
/// addition. Stops short only when no attribute can move.
pub fn repair(space: &SearchSpace<'_>, allocation: &mut Allocation) {
    space.clamp(allocation);

    while allocation.total() > space.budget {
        let bonus = space.aptitude_bonus(allocation);
        let cheapest = AttributeKey::ALL
            .into_iter()
            .filter(|&key| space.can_shrink(allocation, key))
            .map(|key| {
                let cost = space.context.removal_cost(key, allocation.get(key), bonus);
                (key, cost)
            })
            .min_by(|(a_key, a_cost), (b_key, b_cost)| {
                a_cost
                    .total_cmp(b_cost)
                    .then(space.priorities.of(*a_key).total_cmp(&space.priorities.of(*b_key)))
            });

        match cheapest {
            Some((key, _)) => allocation.decrement(key),
            None => break,
        }
    }

    while allocation.total() < space.budget {
        let bonus = space.aptitude_bonus(allocation);
        let best = AttributeKey::ALL
            .into_iter()
            .rev()
            .filter(|&key| space.can_grow(allocation, key))
            .map(|key| (key, space.gain(allocation, key, bonus)))
            .max_by(|(a_key, a_gain), (b_key, b_gain)| {
                a_gain
                    .total_cmp(b_gain)
                    .then(space.priorities.of(*a_key).total_cmp(&space.priorities.of(*b_key)))
            });

        match best {
            Some((key, _)) => allocation.increment(key),
            None => break,
        }
    }
}

/// Copy `parent`, nudge random non-fixed attributes by up to the mutation
/// span, and repair the result.
pub fn mutate<R: Rng + ?Sized>(space: &SearchSpace<'_>, parent: &Allocation, rng: &mut R) -> Allocation {
    let params = space.params;
    let rate = params.mutation_rate.clamp(0.0, 1.0);
    let span = params.mutation_span.max(0);

    let mut child = *parent;
    for key in AttributeKey::ALL {
        if space.floors.is_fixed(key) || !rng.gen_bool(rate) {
            continue;
        }
        let delta = rng.gen_range(-span..=span);
        let moved = (i64::from(child.get(key)) + i64::from(delta)).max(0) as u32;
        child.set(key, moved.clamp(space.floors.floor(key), space.cap(key)));
    }

    repair(space, &mut child);
    child
}

// ============================================================================
// Population loop
// ============================================================================

/// Early-stop bookkeeping.
///
/// The baseline only moves when the best score clears it by more than the
/// threshold, so a run of small gains still adds up to an improvement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stagnation {
    baseline: f64,
    last_improvement: usize,
    threshold: f64,
    window: usize,
}

impl Stagnation {
    pub fn new(initial_best: f64, threshold: f64, window: usize) -> Self {
        Self {
            baseline: initial_best,
            last_improvement: 0,
            threshold,
            window,
        }
    }

    /// Record the best score after `generation`. Returns `true` once more
    /// than `window` generations have passed since the last improvement.
    pub fn observe(&mut self, generation: usize, best: f64) -> bool {
        if best > self.baseline + self.threshold {
            self.baseline = best;
            self.last_improvement = generation;
        }
        generation.saturating_sub(self.last_improvement) > self.window
    }
}

fn by_score_desc(a: &Candidate, b: &Candidate) -> Ordering {
    b.score.total_cmp(&a.score)
}

/// Run the evolutionary search starting from `seed`.
pub fn evolve<R: Rng + ?Sized>(space: &SearchSpace<'_>, seed: Allocation, rng: &mut R) -> EvolutionOutcome {
    let params = space.params;
    let population_size = params.population();
    let elite_count = params.elite_count();
    let mutant_count = params.mutant_count();

    let mut population = Vec::with_capacity(population_size);
    population.push(Candidate::scored(space, seed));
    while population.len() < population_size {
        population.push(Candidate::scored(space, random_candidate(space, rng)));
    }
    population.sort_by(by_score_desc);

    let mut best = population[0];
    let mut stagnation = Stagnation::new(
        best.score,
        params.improvement_threshold,
        params.stagnation_limit,
    );
    let mut generations = 0;
    let mut stopped_early = false;

    tracing::debug!(
        population = population_size,
        elites = elite_count,
        mutants = mutant_count,
        initial_best = best.score,
        "evolution started"
    );

    while generations < params.max_generations {
        generations += 1;

        let mut next = Vec::with_capacity(population_size);
        next.extend_from_slice(&population[..elite_count]);
        for _ in 0..mutant_count {
            let parent = &population[rng.gen_range(0..elite_count)];
            let child = mutate(space, &parent.allocation, rng);
            next.push(Candidate::scored(space, child));
        }
        while next.len() < population_size {
            next.push(Candidate::scored(space, random_candidate(space, rng)));
        }
        next.sort_by(by_score_desc);
        population = next;

        let leader = population[0];
        if leader.score > best.score {
            tracing::trace!(generation = generations, score = leader.score, "new best");
            best = leader;
        }

        if stagnation.observe(generations, best.score) {
            stopped_early = true;
            tracing::debug!(
                generation = generations,
                best = best.score,
                "stopping early, no improvement"
            );
            break;
        }
    }

    EvolutionOutcome {
        best,
        generations,
        stopped_early,
    }
}
