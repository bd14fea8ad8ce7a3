//! Mutation, Repair and Population Loop Tests

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::build_optimizer::evolve::{evolve, mutate, repair, Candidate, Stagnation};
use crate::core::build_optimizer::seed::greedy_seed;
use crate::core::build_optimizer::{Allocation, AttributeKey, HardConstraints, OptimizerParams};
use crate::tests::common::{create_test_request, Fixture};

fn knight_tank(level: u32) -> Fixture {
    Fixture::new(create_test_request(level, "Knight", "tank"))
}

fn assert_valid(fixture: &Fixture, allocation: &Allocation) {
    let space = fixture.space();
    assert_eq!(allocation.total(), space.budget);
    for key in AttributeKey::ALL {
        assert!(allocation.get(key) >= space.floors.floor(key), "{key} below floor");
        assert!(allocation.get(key) <= space.cap(key), "{key} above cap");
    }
}

// ============================================================================
// Repair
// ============================================================================

#[cfg(test)]
mod repair_tests {
    use super::*;

    #[test]
    fn test_repair_trims_over_budget() {
        let fixture = knight_tank(20);
        let space = fixture.space();
        let mut allocation = Allocation::from_points(
            crate::core::build_optimizer::AttributeMap::splat(20),
        );

        repair(&space, &mut allocation);
        assert_valid(&fixture, &allocation);
    }

    #[test]
    fn test_repair_fills_under_budget() {
        let fixture = knight_tank(20);
        let space = fixture.space();
        let mut allocation = Allocation::new();
        allocation.set(AttributeKey::Vit, 10);

        repair(&space, &mut allocation);
        assert_valid(&fixture, &allocation);
    }

    #[test]
    fn test_repair_clamps_to_cap_and_floor() {
        let request = create_test_request(40, "Knight", "tank").with_constraints(HardConstraints {
            min_health: Some(300),
            ..Default::default()
        });
        let fixture = Fixture::new(request);
        let space = fixture.space();
        let mut allocation = Allocation::new();
        allocation.set(AttributeKey::Def, 500);

        repair(&space, &mut allocation);
        assert_valid(&fixture, &allocation);
        assert!(allocation.get(AttributeKey::Vit) >= space.floors.floor(AttributeKey::Vit));
    }

    #[test]
    fn test_repair_takes_from_least_efficient() {
        // STR sits well past its soft cap; trimming it loses the least.
        let fixture = knight_tank(20);
        let space = fixture.space();
        let mut allocation = Allocation::new();
        allocation.set(AttributeKey::Str, 70);
        allocation.set(AttributeKey::Vit, 11);

        repair(&space, &mut allocation);
        assert_eq!(allocation.get(AttributeKey::Vit), 11);
        assert_eq!(allocation.get(AttributeKey::Str), 69);
    }
}

// ============================================================================
// Mutation
// ============================================================================

#[cfg(test)]
mod mutation {
    use super::*;

    #[test]
    fn test_mutants_stay_valid() {
        let mut fixture = knight_tank(30);
        fixture.params.mutation_rate = 1.0;
        let space = fixture.space();
        let parent = greedy_seed(&space);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..20 {
            let child = mutate(&space, &parent, &mut rng);
            assert_valid(&fixture, &child);
        }
    }

    #[test]
    fn test_zero_rate_returns_parent() {
        let mut fixture = knight_tank(30);
        fixture.params.mutation_rate = 0.0;
        let space = fixture.space();
        let parent = greedy_seed(&space);

        let child = mutate(&space, &parent, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(child, parent);
    }
}

// ============================================================================
// Population Loop
// ============================================================================

#[cfg(test)]
mod population {
    use super::*;

    #[test]
    fn test_never_worse_than_seed() {
        let fixture = knight_tank(40);
        let space = fixture.space();
        let seed = greedy_seed(&space);
        let seed_score = Candidate::scored(&space, seed).score;

        let outcome = evolve(&space, seed, &mut ChaCha8Rng::seed_from_u64(11));
        assert!(outcome.best.score >= seed_score);
        assert_valid(&fixture, &outcome.best.allocation);
    }

    #[test]
    fn test_zero_generations_returns_initial_best() {
        let params = OptimizerParams {
            max_generations: 0,
            ..OptimizerParams::quick(5)
        };
        let fixture = knight_tank(20).with_params(params);
        let space = fixture.space();

        let outcome = evolve(&space, greedy_seed(&space), &mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(outcome.generations, 0);
        assert!(!outcome.stopped_early);
    }

    #[test]
    fn test_default_generation_split() {
        let params = OptimizerParams::default();
        assert_eq!(params.population(), 30);
        assert_eq!(params.elite_count(), 9);
        assert_eq!(params.mutant_count(), 18);
        assert_eq!(params.population() - params.elite_count() - params.mutant_count(), 3);
    }

    #[test]
    fn test_run_without_improvement_stops_after_window() {
        let params = OptimizerParams {
            max_generations: 1_000,
            stagnation_limit: 5,
            improvement_threshold: f64::INFINITY,
            ..OptimizerParams::quick(2)
        };
        let fixture = knight_tank(20).with_params(params);
        let space = fixture.space();

        let outcome = evolve(&space, greedy_seed(&space), &mut ChaCha8Rng::seed_from_u64(2));
        assert!(outcome.stopped_early);
        assert_eq!(outcome.generations, 6);
    }

    #[test]
    fn test_generation_cap_ends_run() {
        let params = OptimizerParams {
            max_generations: 3,
            stagnation_limit: 100,
            ..OptimizerParams::quick(2)
        };
        let fixture = knight_tank(20).with_params(params);
        let space = fixture.space();

        let outcome = evolve(&space, greedy_seed(&space), &mut ChaCha8Rng::seed_from_u64(2));
        assert!(!outcome.stopped_early);
        assert_eq!(outcome.generations, 3);
    }

    #[test]
    fn test_reproducible_with_same_seed() {
        let fixture = knight_tank(30);
        let space = fixture.space();
        let seed = greedy_seed(&space);

        let first = evolve(&space, seed, &mut ChaCha8Rng::seed_from_u64(21));
        let second = evolve(&space, seed, &mut ChaCha8Rng::seed_from_u64(21));
        assert_eq!(first, second);
    }
}

// ============================================================================
// Early Stop
// ============================================================================

#[cfg(test)]
mod early_stop {
    use super::*;

    /// Generation at which a run fed `scores` (one best score per generation)
    /// would stop, if it stops at all.
    fn stop_generation(scores: impl IntoIterator<Item = f64>, threshold: f64, window: usize) -> Option<usize> {
        let mut stagnation = Stagnation::new(0.0, threshold, window);
        scores
            .into_iter()
            .enumerate()
            .map(|(index, score)| (index + 1, score))
            .find(|&(generation, score)| stagnation.observe(generation, score))
            .map(|(generation, _)| generation)
    }

    #[test]
    fn test_flat_scores_stop_one_past_window() {
        let flat = std::iter::repeat(0.0).take(500);
        assert_eq!(stop_generation(flat, 1.0, 100), Some(101));
    }

    #[test]
    fn test_gain_equal_to_threshold_is_not_improvement() {
        let scores = std::iter::repeat(1.0).take(500);
        assert_eq!(stop_generation(scores, 1.0, 100), Some(101));
    }

    #[test]
    fn test_small_steady_gains_accumulate() {
        // 0.9 per generation never clears the threshold in one step, but
        // clears it against the baseline every other generation.
        let rising = (1..=500).map(|generation| generation as f64 * 0.9);
        assert_eq!(stop_generation(rising, 1.0, 100), None);
    }

    #[test]
    fn test_window_restarts_at_last_jump() {
        let scores = (1..=500).map(|generation| if generation < 50 { 0.0 } else { 50.0 });
        assert_eq!(stop_generation(scores, 1.0, 100), Some(151));
    }
}
