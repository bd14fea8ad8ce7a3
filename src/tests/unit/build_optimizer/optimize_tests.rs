//! Optimizer Entry Point Tests

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::build_optimizer::{
    optimize, optimize_with_rng, BuildGoal, Catalog, ClassProfile, EntityModifiers, GameData,
    HardConstraints, OptimizerError, OptimizerParams, ScaledStats,
};
use crate::tests::common::{create_test_catalog, create_test_request};

// ============================================================================
// Test Helpers
// ============================================================================

/// Game data whose health formula ignores attributes entirely.
struct FlatHealth(Catalog);

impl GameData for FlatHealth {
    fn race_modifiers(&self, race: &str, subrace: Option<&str>) -> EntityModifiers {
        self.0.race_modifiers(race, subrace)
    }

    fn class_profile(&self, class: &str) -> ClassProfile {
        self.0.class_profile(class)
    }

    fn build_goal(&self, id: &str) -> Option<&BuildGoal> {
        self.0.build_goal(id)
    }

    fn build_goal_ids(&self) -> Vec<String> {
        self.0.build_goal_ids()
    }

    fn health(&self, _stats: &ScaledStats, _level: u32) -> i32 {
        1_000
    }
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unknown_goal_fails_fast() {
    let catalog = create_test_catalog();
    let request = create_test_request(20, "Knight", "berserker");

    let err = optimize(&request, &catalog, &OptimizerParams::quick(1)).unwrap_err();
    match err {
        OptimizerError::UnknownBuildGoal { id, available } => {
            assert_eq!(id, "berserker");
            assert!(available.contains(&"tank".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_race_and_class_still_optimize() {
    let catalog = create_test_catalog();
    let request = create_test_request(20, "Nobody", "tank").with_subrace("ghost");

    let result = optimize(&request, &catalog, &OptimizerParams::quick(1)).unwrap();
    assert_eq!(result.total_points, 80);
}

// ============================================================================
// Results
// ============================================================================

#[test]
fn test_result_spends_budget() {
    let catalog = create_test_catalog();
    let request = create_test_request(30, "Knight", "tank");

    let result = optimize(&request, &catalog, &OptimizerParams::quick(4)).unwrap();
    assert_eq!(result.total_points, 120);
    assert_eq!(result.allocation.total(), 120);
    assert!(result.generations > 0);
}

#[test]
fn test_same_seed_same_result() {
    let catalog = create_test_catalog();
    let request = create_test_request(30, "Mage", "tank").with_sub_class("Knight");
    let params = OptimizerParams::quick(42);

    let first = optimize(&request, &catalog, &params).unwrap();
    let second = optimize(&request, &catalog, &params).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_explicit_rng_matches_seeded_params() {
    let catalog = create_test_catalog();
    let request = create_test_request(25, "Knight", "tank");
    let params = OptimizerParams::quick(8);

    let seeded = optimize(&request, &catalog, &params).unwrap();
    let explicit =
        optimize_with_rng(&request, &catalog, &params, &mut ChaCha8Rng::seed_from_u64(8)).unwrap();
    assert_eq!(seeded, explicit);
}

#[test]
fn test_health_comes_from_game_data() {
    let data = FlatHealth(create_test_catalog());
    let request = create_test_request(20, "Knight", "tank").with_constraints(HardConstraints {
        min_health: Some(900),
        ..Default::default()
    });

    let result = optimize(&request, &data, &OptimizerParams::quick(3)).unwrap();
    assert_eq!(result.health, 1_000);
    assert!(result.reasoning.iter().any(|line| line.contains("meets minimum 900")));
}

// ============================================================================
// Reasoning & Warnings
// ============================================================================

#[test]
fn test_reasoning_names_goal_and_budget() {
    let catalog = create_test_catalog();
    let request = create_test_request(20, "Knight", "tank");

    let result = optimize(&request, &catalog, &OptimizerParams::quick(2)).unwrap();
    assert!(result.reasoning[0].starts_with("Build goal 'Tank' (tank) at level 20"));
    assert!(result.reasoning.iter().any(|line| line.contains("Monoclass Knight")));
}

#[test]
fn test_low_compatibility_warns() {
    let catalog = create_test_catalog();
    let request = create_test_request(20, "Knight", "summoner");

    let result = optimize(&request, &catalog, &OptimizerParams::quick(2)).unwrap();
    assert!(result
        .warnings
        .iter()
        .any(|line| line.contains("low compatibility")));
}

#[test]
fn test_multiclass_aptitude_target_reported() {
    let catalog = create_test_catalog();
    let request = create_test_request(30, "Knight", "tank")
        .with_sub_class("Mage")
        .with_constraints(HardConstraints {
            aptitude_target: Some(12),
            ..Default::default()
        });

    let result = optimize(&request, &catalog, &OptimizerParams::quick(6)).unwrap();
    assert_eq!(result.stats.get(crate::core::build_optimizer::AttributeKey::Apt), 12);
    assert!(result
        .reasoning
        .iter()
        .any(|line| line == "Aptitude held at multiclass target 12"));
}

#[test]
fn test_floor_warnings_surface_in_result() {
    let catalog = create_test_catalog();
    let request = create_test_request(10, "Mage", "tank").with_constraints(HardConstraints {
        min_health: Some(10_000),
        ..Default::default()
    });

    let result = optimize(&request, &catalog, &OptimizerParams::quick(2)).unwrap();
    assert!(result.warnings.iter().any(|line| line.contains("Minimum health")));
    assert!(result.warnings.iter().any(|line| line.contains("Health")));
}

#[test]
fn test_huge_summon_goal_is_clamped_not_fatal() {
    let catalog = create_test_catalog();
    let request = create_test_request(20, "Summoner", "summoner").with_constraints(HardConstraints {
        summon_goal: Some(200_000_000),
        ..Default::default()
    });

    let result = optimize(&request, &catalog, &OptimizerParams::quick(3)).unwrap();
    assert_eq!(result.total_points, 80);
    assert!(result.warnings.iter().any(|line| line.contains("Summon goal")));
}

#[test]
fn test_huge_level_saturates_derived_stats() {
    let catalog = create_test_catalog();
    let request = create_test_request(1 << 30, "Knight", "tank");

    let result = optimize(&request, &catalog, &OptimizerParams::quick(3)).unwrap();
    assert_eq!(result.total_points, 240);
    assert_eq!(result.health, i32::MAX);
}
