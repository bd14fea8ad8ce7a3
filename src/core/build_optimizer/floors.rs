//! Hard-constraint reservations.
//!
//! Attribute floors come off the top of the budget before any
//! priority-driven distribution, in this order:
//!
//! 1. Aptitude target (multiclass only). Aptitude is then fixed.
//! 2. Faith needed for the summon goal.
//! 3. Vitality needed for the minimum health.
//!
//! Every later phase keeps candidates at or above these floors.

use super::attributes::{Allocation, AttributeKey, AttributeMap};
use super::catalog::{faith_for_summons, GameData};
use super::request::OptimizationRequest;
use super::scaling::{aptitude_bonus, BuildContext};

/// Invested-point floors and fixed attributes for one run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Floors {
    /// Minimum invested points per attribute.
    pub minimum: AttributeMap<u32>,
    /// Attributes the search must not change.
    pub fixed: AttributeMap<bool>,
    /// Investment required by the summon goal, if any.
    pub faith_floor: Option<u32>,
    /// Constraints that could not be fully reserved.
    pub warnings: Vec<String>,
}

impl Floors {
    /// Reserve points for every hard constraint in `request`.
    pub fn compute(
        request: &OptimizationRequest,
        context: &BuildContext,
        data: &dyn GameData,
        budget: u32,
    ) -> Self {
        let mut floors = Floors::default();
        let mut reserved = Allocation::new();
        let mut remaining = budget;

        if let Some(target) = request.multiclass_aptitude_target() {
            let points = floors.reserve(
                context,
                &mut remaining,
                AttributeKey::Apt,
                target,
                0,
                "Aptitude target",
            );
            reserved.set(AttributeKey::Apt, points);
            floors.fixed[AttributeKey::Apt] = true;
        }

        let bonus = aptitude_bonus(context.resolve_aptitude(&reserved));

        if let Some(summons) = request.constraints.summon_goal.filter(|n| *n > 0) {
            let needed = faith_for_summons(summons);
            let points = floors.reserve(
                context,
                &mut remaining,
                AttributeKey::Fai,
                needed,
                bonus,
                "summon goal Faith",
            );
            reserved.set(AttributeKey::Fai, points);
            floors.faith_floor = Some(points);
        }

        if let Some(min_health) = request.constraints.min_health {
            let cap = context.invest_cap(AttributeKey::Vit);
            while data.health(&context.evaluate(&reserved), request.level) < min_health {
                if remaining == 0 || reserved.get(AttributeKey::Vit) >= cap {
                    floors.warnings.push(format!(
                        "Minimum health {} cannot be reserved through VIT alone",
                        min_health
                    ));
                    break;
                }
                reserved.increment(AttributeKey::Vit);
                remaining -= 1;
            }
        }

        floors.minimum = *reserved.points();
        tracing::debug!(
            reserved = reserved.total(),
            faith_floor = ?floors.faith_floor,
            aptitude_fixed = floors.fixed[AttributeKey::Apt],
            "hard constraints reserved"
        );
        floors
    }

    /// Invest the fewest points that make `key` reach `target`, limited by
    /// cap and remaining budget.
    fn reserve(
        &mut self,
        context: &BuildContext,
        remaining: &mut u32,
        key: AttributeKey,
        target: i32,
        bonus: i32,
        label: &str,
    ) -> u32 {
        let limit = context.invest_cap(key).min(*remaining);
        let points = match context.points_to_reach(key, target, 0, bonus) {
            Some(points) if points <= limit => points,
            _ => {
                self.warnings.push(format!(
                    "{} of {} {} is out of reach; reserving {} points",
                    label, target, key, limit
                ));
                limit
            }
        };
        *remaining -= points;
        points
    }

    /// Allocation holding exactly the floors.
    pub fn base_allocation(&self) -> Allocation {
        Allocation::from_points(self.minimum)
    }

    /// Points reserved in total.
    pub fn reserved_total(&self) -> u32 {
        self.base_allocation().total()
    }

    #[inline]
    pub fn floor(&self, key: AttributeKey) -> u32 {
        self.minimum.get(key)
    }

    #[inline]
    pub fn is_fixed(&self, key: AttributeKey) -> bool {
        self.fixed.get(key)
    }
}
