//! Combined attribute priority.
//!
//! Four signals, each on a 0-10 scale, are blended per attribute:
//!
//! | Signal | Weight | Source |
//! |---|---|---|
//! | build goal | 3.0 | goal priority table |
//! | weapon scaling | 2.0 | favored attributes of the classes' equipment |
//! | class synergy | 1.0 | attributes the classes grant bonuses to |
//! | custom weight | 1.5 | named sliders |

use std::collections::BTreeSet;

use super::attributes::{AttributeKey, AttributeMap};
use super::catalog::{BuildGoal, ClassProfile};
use super::request::{OptimizationRequest, SLIDER_MAX};

pub const GOAL_WEIGHT: f64 = 3.0;
pub const WEAPON_WEIGHT: f64 = 2.0;
pub const SYNERGY_WEIGHT: f64 = 1.0;
pub const CUSTOM_WEIGHT: f64 = 1.5;

/// Class bonus multiplier for the synergy signal when both slots match.
///
/// Independent of [`super::scaling::MONOCLASS_SCALING_MULTIPLIER`], which only
/// touches the class contribution to attribute values.
pub const MONOCLASS_SYNERGY_MULTIPLIER: f64 = 2.0;

const SIGNAL_MAX: f64 = 10.0;
const PRIMARY_FAVOR: f64 = 5.0;
const SECONDARY_FAVOR: f64 = 3.0;

/// Per-attribute priority signals and their blend.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityProfile {
    pub goal: AttributeMap<f64>,
    pub weapon: AttributeMap<f64>,
    pub synergy: AttributeMap<f64>,
    pub custom: AttributeMap<f64>,
    pub combined: AttributeMap<f64>,
}

impl PriorityProfile {
    /// Blend all four signals for a request.
    pub fn compute(
        request: &OptimizationRequest,
        goal: &BuildGoal,
        main: &ClassProfile,
        sub: &ClassProfile,
    ) -> Self {
        let goal_signal = AttributeMap::from_fn(|key| f64::from(goal.priority(key)));
        let weapon = weapon_scaling_priority(main, sub);
        let synergy = class_synergy_priority(main, sub, request.is_monoclass());
        let custom = custom_weight_priority(request);

        let combined = AttributeMap::from_fn(|key| {
            GOAL_WEIGHT * goal_signal[key]
                + WEAPON_WEIGHT * weapon[key]
                + SYNERGY_WEIGHT * synergy[key]
                + CUSTOM_WEIGHT * custom[key]
        });

        Self {
            goal: goal_signal,
            weapon,
            synergy,
            custom,
            combined,
        }
    }

    /// Combined priority for `key`.
    #[inline]
    pub fn of(&self, key: AttributeKey) -> f64 {
        self.combined[key]
    }

    /// Attributes ordered by combined priority, highest first.
    pub fn ranked(&self) -> Vec<AttributeKey> {
        let mut keys = AttributeKey::ALL.to_vec();
        keys.sort_by(|a, b| self.combined[*b].total_cmp(&self.combined[*a]));
        keys
    }
}

/// Priority implied by the equipment both classes can use.
pub fn weapon_scaling_priority(main: &ClassProfile, sub: &ClassProfile) -> AttributeMap<f64> {
    let categories: BTreeSet<_> = main.equipment.iter().chain(&sub.equipment).copied().collect();

    let mut signal = AttributeMap::<f64>::default();
    for category in categories {
        for (rank, key) in category.favored_attributes().iter().enumerate() {
            signal[*key] += if rank == 0 { PRIMARY_FAVOR } else { SECONDARY_FAVOR };
        }
    }
    signal.map(|_, value| value.min(SIGNAL_MAX))
}

/// Priority implied by the classes' own attribute bonuses.
pub fn class_synergy_priority(
    main: &ClassProfile,
    sub: &ClassProfile,
    monoclass: bool,
) -> AttributeMap<f64> {
    AttributeMap::from_fn(|key| {
        let raw = if monoclass {
            f64::from(main.bonuses[key]) * MONOCLASS_SYNERGY_MULTIPLIER
        } else {
            f64::from(main.bonuses[key] + sub.bonuses[key])
        };
        raw.clamp(0.0, SIGNAL_MAX)
    })
}

/// Priority implied by the request's custom weight sliders.
pub fn custom_weight_priority(request: &OptimizationRequest) -> AttributeMap<f64> {
    let mut signal = AttributeMap::<f64>::default();
    for (weight, value) in request.active_sliders() {
        let strength = f64::from(value) / f64::from(SLIDER_MAX);
        for (key, contribution) in weight.contributions() {
            signal[*key] += strength * contribution;
        }
    }
    signal.map(|_, value| value.min(SIGNAL_MAX))
}
