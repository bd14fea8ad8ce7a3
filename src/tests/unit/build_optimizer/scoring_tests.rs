//! Scoring Tests

use crate::core::build_optimizer::scoring::{aptitude_waste, score};
use crate::core::build_optimizer::{
    Allocation, AttributeKey, HardConstraints, OptimizationMode,
};
use crate::tests::common::{create_test_request, Fixture};

fn summoner_fixture(summon_goal: Option<u32>) -> Fixture {
    let request = create_test_request(40, "Summoner", "summoner").with_constraints(
        HardConstraints {
            summon_goal,
            ..Default::default()
        },
    );
    Fixture::new(request)
}

// ============================================================================
// Weight-Directed
// ============================================================================

#[cfg(test)]
mod weight_directed {
    use super::*;

    #[test]
    fn test_unused_points_are_penalized() {
        // No thresholds and no priorities: only the unused-point penalty remains.
        let fixture = Fixture::new(create_test_request(20, "Nobody", "empty"));
        let space = fixture.space();

        assert_eq!(score(&space, &Allocation::new()), -1600.0);
    }

    #[test]
    fn test_faith_floor_violation_costs_at_least_penalty() {
        let fixture = summoner_fixture(Some(2));
        let space = fixture.space();
        let at_floor = space.floors.base_allocation();
        let mut below = at_floor;
        below.decrement(AttributeKey::Fai);

        assert!(score(&space, &below) <= score(&space, &at_floor) - 500.0);
    }

    #[test]
    fn test_supported_summon_goal_earns_bonus() {
        let with_goal = summoner_fixture(Some(2));
        let without_goal = summoner_fixture(None);
        let allocation = with_goal.space().floors.base_allocation();

        let difference =
            score(&with_goal.space(), &allocation) - score(&without_goal.space(), &allocation);
        assert!((difference - 300.0).abs() < 1e-9, "difference {difference}");
    }

    #[test]
    fn test_aptitude_waste_counts_partial_steps() {
        let fixture = Fixture::new(create_test_request(20, "Knight", "tank"));
        let space = fixture.space();

        let mut allocation = Allocation::new();
        allocation.set(AttributeKey::Apt, 8);
        let stats = space.evaluate(&allocation);
        assert_eq!(aptitude_waste(&allocation, &stats), 2);

        allocation.set(AttributeKey::Apt, 12);
        let stats = space.evaluate(&allocation);
        assert_eq!(aptitude_waste(&allocation, &stats), 0);
    }
}

// ============================================================================
// Target-Directed
// ============================================================================

#[cfg(test)]
mod target_directed {
    use super::*;

    fn target_fixture() -> Fixture {
        let request = create_test_request(20, "Nobody", "empty")
            .with_mode(OptimizationMode::TargetDirected)
            .with_target(AttributeKey::Vit, 20);
        Fixture::new(request)
    }

    fn vit(points: u32) -> Allocation {
        let mut allocation = Allocation::new();
        allocation.set(AttributeKey::Vit, points);
        allocation
    }

    #[test]
    fn test_met_target_rewarded() {
        let fixture = target_fixture();
        assert_eq!(score(&fixture.space(), &vit(20)), 100.0);
    }

    #[test]
    fn test_shortfall_penalized_per_point() {
        let fixture = target_fixture();
        assert_eq!(score(&fixture.space(), &vit(19)), -10.0);
    }

    #[test]
    fn test_budget_overflow_penalized_heavily() {
        let fixture = target_fixture();
        assert_eq!(score(&fixture.space(), &vit(81)), -900.0);
    }

    #[test]
    fn test_health_floor_applies_in_target_mode() {
        // Level 20 with no VIT: 120 HP, 80 short of 200.
        let request = create_test_request(20, "Nobody", "empty")
            .with_mode(OptimizationMode::TargetDirected)
            .with_constraints(HardConstraints {
                min_health: Some(200),
                ..Default::default()
            });
        let fixture = Fixture::new(request);

        assert_eq!(score(&fixture.space(), &Allocation::new()), -360.0);
    }
    #[test]
    fn test_extreme_targets_score_without_overflow() {
        let request = create_test_request(20, "Nobody", "empty")
            .with_mode(OptimizationMode::TargetDirected)
            .with_target(AttributeKey::Apt, i32::MAX)
            .with_target(AttributeKey::Luc, i32::MIN);
        let fixture = Fixture::new(request);

        let expected = 100.0 - f64::from(i32::MAX) * 10.0;
        assert_eq!(score(&fixture.space(), &Allocation::new()), expected);
    }
}
