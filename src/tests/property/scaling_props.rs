//! Property-based tests for the scaling engine
//!
//! Tests invariants:
//! - Below the soft cap the transform is the identity
//! - More added points never lower the effective value
//! - Each further point is worth no more than the previous one
//! - Efficiency bottoms out at 0.1 per point

use proptest::prelude::*;

use crate::core::build_optimizer::scaling::{aptitude_bonus, marginal_gain, scale, scale_exact};
use crate::core::build_optimizer::Contributions;

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

fn arb_contributions() -> impl Strategy<Value = Contributions> {
    (0i32..30, 0i32..150, 0i32..12, 0i32..8, 0u32..4).prop_map(
        |(racial, added, custom, aptitude_bonus, units)| Contributions {
            racial,
            added,
            class_value: 0.0,
            custom,
            aptitude_bonus,
            percent_bonus_units: units,
        },
    )
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: at or below the soft cap the value is unchanged
    #[test]
    fn prop_identity_below_soft_cap(racial in 0i32..40, added in 0i32..=40) {
        let contributions = Contributions { racial, added, ..Default::default() };
        prop_assert_eq!(scale(&contributions), racial + added);
    }

    /// Property: effective value is monotonic in added points
    #[test]
    fn prop_monotonic(contributions in arb_contributions()) {
        let more = contributions.with_added(1);
        prop_assert!(scale_exact(&more) >= scale_exact(&contributions));
        prop_assert!(scale(&more) >= scale(&contributions));
    }

    /// Property: marginal gain never increases (percent bonus floors aside)
    #[test]
    fn prop_marginal_gain_non_increasing(contributions in arb_contributions()) {
        let contributions = Contributions { percent_bonus_units: 0, ..contributions };
        let now = marginal_gain(&contributions);
        let next = marginal_gain(&contributions.with_added(1));
        prop_assert!(
            next <= now + 1e-9,
            "gain rose from {} to {} at added {}",
            now,
            next,
            contributions.added
        );
    }

    /// Property: efficiency stays within [0.1, 1] without the percent bonus
    #[test]
    fn prop_marginal_gain_bounded(racial in 0i32..30, added in 0i32..200) {
        let contributions = Contributions { racial, added, ..Default::default() };
        let gain = marginal_gain(&contributions);
        prop_assert!(gain >= 0.1 - 1e-9, "gain {} below floor", gain);
        prop_assert!(gain <= 1.0 + 1e-9, "gain {} above 1", gain);
    }

    /// Property: scaling never exceeds the raw total
    #[test]
    fn prop_scaled_at_most_raw(contributions in arb_contributions()) {
        prop_assert!(scale_exact(&contributions) <= contributions.raw_total() + 1e-9);
    }

    /// Property: aptitude bonus is floor(APT / 6) and never negative
    #[test]
    fn prop_aptitude_bonus(aptitude in -20i32..200) {
        let bonus = aptitude_bonus(aptitude);
        prop_assert!(bonus >= 0);
        if aptitude >= 0 {
            prop_assert_eq!(bonus, aptitude / 6);
        }
    }
}
