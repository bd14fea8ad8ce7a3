//! Stat-scaling engine.
//!
//! Converts the raw contributions to one attribute into its effective
//! ("scaled") value. Up to the soft cap the value is linear; past it every
//! full 3-point chunk is worth less than the previous one, bottoming out at
//! 10% efficiency.
//!
//! ```text
//! effective
//!    ^                         ______________ 0.1 / pt
//!    |                  ______/
//!    |           ___---/   decreasing multiplier per 3-pt chunk
//!    |       _--/
//!    |     /  soft cap = racial + 40 (+ percent units)
//!    |   /
//!    | /  1.0 / pt
//!    +--------------------------------------> total
//! ```
//!
//! Aptitude feeds every other attribute with `floor(scaled APT / 6)`, so an
//! evaluation is always two-phase: [`BuildContext::resolve_aptitude`] first,
//! then the remaining eleven attributes with that bonus fixed.

use serde::{Deserialize, Serialize};

use super::attributes::{Allocation, AttributeKey, AttributeMap};
use super::catalog::GameData;
use super::request::OptimizationRequest;

// ============================================================================
// Constants
// ============================================================================

/// Distance of the soft cap above the racial contribution.
pub const SOFT_CAP_OFFSET: i32 = 40;

/// Ceiling on racial + custom base + invested + fixed bonuses for one attribute.
pub const HARD_CAP: i32 = 80;

/// Scaled Aptitude per point of bonus granted to the other attributes.
pub const APTITUDE_STEP: i32 = 6;

/// Class contribution multiplier when main and sub class are the same.
pub const MONOCLASS_SCALING_MULTIPLIER: f64 = 1.1;

/// Request-supplied flat bonuses are clamped to `-BONUS_LIMIT..=BONUS_LIMIT`.
pub const BONUS_LIMIT: i32 = HARD_CAP;

/// Attributes that receive the percentage bonus.
pub const PERCENT_BONUS_ATTRIBUTES: [AttributeKey; 2] = [AttributeKey::Str, AttributeKey::Wil];

const CHUNK_SIZE: f64 = 3.0;
// Multipliers are tracked in hundredths so every step stays exact.
const START_MULTIPLIER_PCT: i64 = 90;
const MULTIPLIER_STEP_PCT: i64 = 8;
const MULTIPLIER_FLOOR_PCT: i64 = 10;
const PERCENT_RATE: f64 = 0.05;
const PERCENT_UNIT_DIVISOR: f64 = 3.0;

// ============================================================================
// Contributions & scaling functions
// ============================================================================

/// Raw inputs for one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Contributions {
    /// Race/subrace base + custom base + flat racial modifiers.
    pub racial: i32,
    /// Invested points plus every pre-cap additive bonus. Must not be negative.
    pub added: i32,
    /// Main + sub class bonus, times the monoclass multiplier.
    pub class_value: f64,
    /// Flat direct bonus.
    pub custom: i32,
    /// `floor(scaled APT / 6)`; always 0 for Aptitude itself.
    pub aptitude_bonus: i32,
    /// Percent-bonus units; 0 when inactive.
    pub percent_bonus_units: u32,
}

impl Contributions {
    /// Value above which further points lose efficiency.
    pub fn soft_cap(&self) -> i32 {
        let units = i32::try_from(self.percent_bonus_units).unwrap_or(i32::MAX);
        self.racial.saturating_add(SOFT_CAP_OFFSET).saturating_add(units)
    }

    /// Pre-transform total, including the percentage bonus.
    pub fn raw_total(&self) -> f64 {
        let mut total = f64::from(self.racial)
            + f64::from(self.added)
            + self.class_value
            + f64::from(self.custom)
            + f64::from(self.aptitude_bonus);

        if self.percent_bonus_units > 0 {
            let units = f64::from(self.percent_bonus_units);
            total += (total * PERCENT_RATE * (units / PERCENT_UNIT_DIVISOR)).floor();
        }

        total
    }

    /// Copy with `delta` more added points.
    pub fn with_added(mut self, delta: i32) -> Self {
        self.added = self.added.saturating_add(delta);
        self
    }
}

/// Effective value before the final floor.
///
/// Used for marginal-efficiency comparisons, where flooring would hide the
/// fractional loss of each point past the soft cap.
pub fn scale_exact(contributions: &Contributions) -> f64 {
    debug_assert!(contributions.added >= 0, "negative added points reached the scaling engine");

    let soft_cap = f64::from(contributions.soft_cap());
    let total = contributions.raw_total();

    if total <= soft_cap {
        return total;
    }

    // Work in hundredths: soft cap, chunk sizes and multipliers are all whole
    // hundredths, so integer totals never pick up rounding error.
    let mut effective = soft_cap * 100.0;
    let mut remaining = total - soft_cap;
    let mut multiplier = START_MULTIPLIER_PCT;

    // Once the multiplier bottoms out every remaining point earns the floor.
    while remaining > CHUNK_SIZE && multiplier > MULTIPLIER_FLOOR_PCT {
        remaining -= CHUNK_SIZE;
        effective += CHUNK_SIZE * multiplier as f64;
        multiplier = (multiplier - MULTIPLIER_STEP_PCT).max(MULTIPLIER_FLOOR_PCT);
    }
    effective += remaining * multiplier as f64;

    effective / 100.0
}

/// Effective (scaled) value of one attribute.
pub fn scale(contributions: &Contributions) -> i32 {
    // `as` saturates, so absurd inputs pin at the i32 range.
    scale_exact(contributions).floor() as i32
}

/// Gain in exact effective value from one more added point.
pub fn marginal_gain(contributions: &Contributions) -> f64 {
    scale_exact(&contributions.with_added(1)) - scale_exact(contributions)
}

/// Bonus every non-Aptitude attribute receives from scaled Aptitude.
#[inline]
pub fn aptitude_bonus(scaled_aptitude: i32) -> i32 {
    scaled_aptitude.max(0) / APTITUDE_STEP
}

// ============================================================================
// ScaledStats
// ============================================================================

/// Fully resolved attribute values for one allocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaledStats {
    /// Values before the diminishing-returns transform (eligibility checks).
    pub raw: AttributeMap<i32>,
    /// Effective values after scaling.
    pub scaled: AttributeMap<i32>,
    /// Flat bonus derived from scaled Aptitude.
    pub aptitude_bonus: i32,
}

impl ScaledStats {
    /// Scaled value for `key`.
    #[inline]
    pub fn get(&self, key: AttributeKey) -> i32 {
        self.scaled.get(key)
    }

    /// Raw value for `key`.
    #[inline]
    pub fn raw(&self, key: AttributeKey) -> i32 {
        self.raw.get(key)
    }
}

// ============================================================================
// BuildContext
// ============================================================================

/// Everything but the invested points, resolved once per optimization run.
///
/// Read-only for the whole run; candidate allocations are evaluated against
/// it without touching each other.
#[derive(Debug, Clone)]
pub struct BuildContext {
    racial: AttributeMap<i32>,
    pre_cap: AttributeMap<i32>,
    class_value: AttributeMap<f64>,
    custom: AttributeMap<i32>,
    percent_units: AttributeMap<u32>,
    caps: AttributeMap<u32>,
}

impl BuildContext {
    /// Resolve race, class and bonus tables for `request`.
    ///
    /// `max_raw_investment` limits invested points per attribute on top of the
    /// hard cap.
    pub fn from_request(
        request: &OptimizationRequest,
        data: &dyn GameData,
        max_raw_investment: u32,
    ) -> Self {
        let race = data.race_modifiers(&request.race, request.subrace.as_deref());
        let main = data.class_profile(&request.main_class);
        let sub = data.class_profile(&request.sub_class);

        let class_multiplier = if request.is_monoclass() {
            MONOCLASS_SCALING_MULTIPLIER
        } else {
            1.0
        };

        let bonuses = &request.bonuses;
        let clamp_bonus = |value: i32| value.clamp(-BONUS_LIMIT, BONUS_LIMIT);

        let racial = AttributeMap::from_fn(|key| {
            race.base[key]
                .saturating_add(race.bonus[key])
                .saturating_add(clamp_bonus(bonuses.custom_base[key]))
        });
        let class_value = AttributeMap::from_fn(|key| {
            f64::from(main.bonuses[key].saturating_add(sub.bonuses[key])) * class_multiplier
        });
        let percent_units = AttributeMap::from_fn(|key| match bonuses.percent {
            Some(bonus) if PERCENT_BONUS_ATTRIBUTES.contains(&key) => {
                bonus.units.min(BONUS_LIMIT as u32)
            }
            _ => 0,
        });

        Self::new(
            racial,
            bonuses.pre_cap.map(|_, value| clamp_bonus(*value)),
            class_value,
            bonuses.custom.map(|_, value| clamp_bonus(*value)),
            percent_units,
            max_raw_investment,
        )
    }

    /// Build a context from already-combined contribution tables.
    pub fn new(
        racial: AttributeMap<i32>,
        pre_cap: AttributeMap<i32>,
        class_value: AttributeMap<f64>,
        custom: AttributeMap<i32>,
        percent_units: AttributeMap<u32>,
        max_raw_investment: u32,
    ) -> Self {
        let caps = AttributeMap::from_fn(|key| {
            let room = HARD_CAP
                .saturating_sub(racial[key])
                .saturating_sub(pre_cap[key].max(0))
                .max(0);
            (room as u32).min(max_raw_investment)
        });

        Self {
            racial,
            pre_cap,
            class_value,
            custom,
            percent_units,
            caps,
        }
    }

    /// Most points that may be invested in `key`.
    #[inline]
    pub fn invest_cap(&self, key: AttributeKey) -> u32 {
        self.caps.get(key)
    }

    /// Racial contribution for `key` (base, subrace, custom base).
    #[inline]
    pub fn racial(&self, key: AttributeKey) -> i32 {
        self.racial.get(key)
    }

    /// Contributions for `key` with `invested` points.
    ///
    /// Negative pre-cap bonuses never push `added` below zero.
    pub fn contributions(&self, key: AttributeKey, invested: u32, aptitude_bonus: i32) -> Contributions {
        Contributions {
            racial: self.racial[key],
            added: i32::try_from(invested)
                .unwrap_or(i32::MAX)
                .saturating_add(self.pre_cap[key])
                .max(0),
            class_value: self.class_value[key],
            custom: self.custom[key],
            aptitude_bonus: if key.is_aptitude() { 0 } else { aptitude_bonus },
            percent_bonus_units: self.percent_units[key],
        }
    }

    /// Phase one: scaled Aptitude for `allocation`.
    pub fn resolve_aptitude(&self, allocation: &Allocation) -> i32 {
        self.scaled_value(AttributeKey::Apt, allocation.get(AttributeKey::Apt), 0)
    }

    /// Both phases: every attribute for `allocation`.
    pub fn evaluate(&self, allocation: &Allocation) -> ScaledStats {
        let scaled_apt = self.resolve_aptitude(allocation);
        let bonus = aptitude_bonus(scaled_apt);

        let mut raw = AttributeMap::default();
        let mut scaled = AttributeMap::default();
        for key in AttributeKey::ALL {
            let contributions = self.contributions(key, allocation.get(key), bonus);
            raw[key] = contributions.raw_total().floor() as i32;
            scaled[key] = if key.is_aptitude() {
                scaled_apt
            } else {
                scale(&contributions)
            };
        }

        ScaledStats {
            raw,
            scaled,
            aptitude_bonus: bonus,
        }
    }

    /// Scaled value of `key` with `invested` points and a resolved Aptitude bonus.
    pub fn scaled_value(&self, key: AttributeKey, invested: u32, aptitude_bonus: i32) -> i32 {
        scale(&self.contributions(key, invested, aptitude_bonus))
    }

    /// Highest value `key` can scale to within its investment cap.
    pub fn max_value(&self, key: AttributeKey, aptitude_bonus: i32) -> i32 {
        self.scaled_value(key, self.invest_cap(key), aptitude_bonus)
    }

    /// Efficiency of the next point in `key`.
    pub fn marginal_gain(&self, key: AttributeKey, invested: u32, aptitude_bonus: i32) -> f64 {
        marginal_gain(&self.contributions(key, invested, aptitude_bonus))
    }

    /// Efficiency lost by taking the last point out of `key`.
    pub fn removal_cost(&self, key: AttributeKey, invested: u32, aptitude_bonus: i32) -> f64 {
        if invested == 0 {
            return 0.0;
        }
        self.marginal_gain(key, invested - 1, aptitude_bonus)
    }

    /// Fewest invested points (at least `from`) for `key` to scale to
    /// `target`, or `None` if the cap is hit first.
    pub fn points_to_reach(
        &self,
        key: AttributeKey,
        target: i32,
        from: u32,
        aptitude_bonus: i32,
    ) -> Option<u32> {
        (from..=self.invest_cap(key).max(from))
            .find(|&points| self.scaled_value(key, points, aptitude_bonus) >= target)
    }
}
