//! Hard-Constraint Reservation Tests
//!
//! Floors are reserved in a fixed order (Aptitude target, summon Faith,
//! health Vitality) before any priority-driven spending.

use crate::core::build_optimizer::{AttributeKey, HardConstraints};
use crate::tests::common::{create_test_request, Fixture};

// ============================================================================
// Test Helpers
// ============================================================================

fn constrained(
    level: u32,
    main: &str,
    sub: &str,
    goal: &str,
    constraints: HardConstraints,
) -> Fixture {
    Fixture::new(
        create_test_request(level, main, goal)
            .with_sub_class(sub)
            .with_constraints(constraints),
    )
}

// ============================================================================
// Aptitude Target
// ============================================================================

#[cfg(test)]
mod aptitude_target {
    use super::*;

    #[test]
    fn test_multiclass_target_is_reserved_and_fixed() {
        let fixture = constrained(
            30,
            "Knight",
            "Mage",
            "tank",
            HardConstraints {
                aptitude_target: Some(12),
                ..Default::default()
            },
        );
        let space = fixture.space();

        assert_eq!(space.floors.floor(AttributeKey::Apt), 12);
        assert!(space.floors.is_fixed(AttributeKey::Apt));
        assert_eq!(space.floors.reserved_total(), 12);
        assert!(space.floors.warnings.is_empty());
    }

    #[test]
    fn test_monoclass_ignores_target() {
        let fixture = constrained(
            30,
            "Knight",
            "Knight",
            "tank",
            HardConstraints {
                aptitude_target: Some(12),
                ..Default::default()
            },
        );
        let space = fixture.space();

        assert_eq!(space.floors.floor(AttributeKey::Apt), 0);
        assert!(!space.floors.is_fixed(AttributeKey::Apt));
    }
}

// ============================================================================
// Summon Faith
// ============================================================================

#[cfg(test)]
mod summon_faith {
    use super::*;

    #[test]
    fn test_faith_reserved_for_summons() {
        // Monoclass Summoner: class FAI (3 + 3) * 1.1 = 6.6, needs 24 final.
        let fixture = constrained(
            40,
            "Summoner",
            "Summoner",
            "summoner",
            HardConstraints {
                summon_goal: Some(2),
                ..Default::default()
            },
        );
        let space = fixture.space();

        assert_eq!(space.floors.floor(AttributeKey::Fai), 18);
        assert_eq!(space.floors.faith_floor, Some(18));
    }

    #[test]
    fn test_aptitude_reserved_before_faith() {
        // APT 12 grants +2, class FAI 3: 19 invested reaches 24.
        let fixture = constrained(
            40,
            "Summoner",
            "Knight",
            "summoner",
            HardConstraints {
                summon_goal: Some(2),
                aptitude_target: Some(12),
                ..Default::default()
            },
        );
        let space = fixture.space();

        assert_eq!(space.floors.floor(AttributeKey::Apt), 12);
        assert_eq!(space.floors.floor(AttributeKey::Fai), 19);
    }

    #[test]
    fn test_zero_summons_reserve_nothing() {
        let fixture = constrained(
            40,
            "Summoner",
            "Summoner",
            "summoner",
            HardConstraints {
                summon_goal: Some(0),
                ..Default::default()
            },
        );
        let space = fixture.space();

        assert_eq!(space.floors.faith_floor, None);
        assert_eq!(space.floors.reserved_total(), 0);
    }

    #[test]
    fn test_unreachable_summon_goal_warns_and_caps() {
        let fixture = constrained(
            60,
            "Summoner",
            "Summoner",
            "summoner",
            HardConstraints {
                summon_goal: Some(10),
                ..Default::default()
            },
        );
        let space = fixture.space();

        assert_eq!(space.floors.faith_floor, Some(80));
        assert_eq!(space.floors.warnings.len(), 1);
        assert!(space.floors.warnings[0].contains("summon goal Faith"));
    }
}

// ============================================================================
// Minimum Health
// ============================================================================

#[cfg(test)]
mod minimum_health {
    use super::*;

    #[test]
    fn test_vitality_reserved_for_health() {
        // Level 10 with no VIT: 40 + 40 = 80 HP, 8 HP per VIT.
        let fixture = constrained(
            10,
            "Mage",
            "Mage",
            "tank",
            HardConstraints {
                min_health: Some(120),
                ..Default::default()
            },
        );
        let space = fixture.space();

        assert_eq!(space.floors.floor(AttributeKey::Vit), 5);
        assert!(space.floors.warnings.is_empty());
    }

    #[test]
    fn test_unreachable_health_spends_budget_and_warns() {
        let fixture = constrained(
            10,
            "Mage",
            "Mage",
            "tank",
            HardConstraints {
                min_health: Some(10_000),
                ..Default::default()
            },
        );
        let space = fixture.space();

        assert_eq!(space.floors.floor(AttributeKey::Vit), 40);
        assert!(space.floors.warnings[0].contains("Minimum health"));
    }

    #[test]
    fn test_met_health_reserves_nothing() {
        let fixture = constrained(
            10,
            "Mage",
            "Mage",
            "tank",
            HardConstraints {
                min_health: Some(50),
                ..Default::default()
            },
        );
        assert_eq!(fixture.space().floors.reserved_total(), 0);
    }
}
