//! Immutable search configuration shared by every optimizer phase.

use super::attributes::{Allocation, AttributeKey};
use super::catalog::{BuildGoal, GameData};
use super::floors::Floors;
use super::params::OptimizerParams;
use super::priority::PriorityProfile;
use super::request::OptimizationRequest;
use super::scaling::{aptitude_bonus, BuildContext, ScaledStats};

/// Everything a phase needs besides the candidate itself.
///
/// Built once per run and only ever borrowed, so seed, sampler, mutation and
/// scoring can each be exercised on their own in tests.
pub struct SearchSpace<'a> {
    pub request: &'a OptimizationRequest,
    pub goal: &'a BuildGoal,
    pub data: &'a dyn GameData,
    pub params: &'a OptimizerParams,
    pub context: BuildContext,
    pub priorities: PriorityProfile,
    pub floors: Floors,
    pub budget: u32,
}

impl<'a> SearchSpace<'a> {
    pub fn new(
        request: &'a OptimizationRequest,
        goal: &'a BuildGoal,
        data: &'a dyn GameData,
        params: &'a OptimizerParams,
    ) -> Self {
        let budget = request.effective_budget();
        let context = BuildContext::from_request(request, data, params.max_raw_investment);
        let main = data.class_profile(&request.main_class);
        let sub = data.class_profile(&request.sub_class);
        let priorities = PriorityProfile::compute(request, goal, &main, &sub);
        let floors = Floors::compute(request, &context, data, budget);

        Self {
            request,
            goal,
            data,
            params,
            context,
            priorities,
            floors,
            budget,
        }
    }

    /// Upper bound for invested points in `key`.
    ///
    /// Never below the floor, so a reservation the hard cap cannot hold still
    /// counts as a valid position.
    pub fn cap(&self, key: AttributeKey) -> u32 {
        self.context.invest_cap(key).max(self.floors.floor(key))
    }

    /// Whether the search may add a point to `key`.
    pub fn can_grow(&self, allocation: &Allocation, key: AttributeKey) -> bool {
        !self.floors.is_fixed(key) && allocation.get(key) < self.cap(key)
    }

    /// Whether the search may remove a point from `key`.
    pub fn can_shrink(&self, allocation: &Allocation, key: AttributeKey) -> bool {
        !self.floors.is_fixed(key) && allocation.get(key) > self.floors.floor(key)
    }

    /// Clamp every attribute into `[floor, cap]`; fixed attributes sit on their floor.
    pub fn clamp(&self, allocation: &mut Allocation) {
        for key in AttributeKey::ALL {
            let floor = self.floors.floor(key);
            let points = if self.floors.is_fixed(key) {
                floor
            } else {
                allocation.get(key).clamp(floor, self.cap(key))
            };
            allocation.set(key, points);
        }
    }

    /// Aptitude bonus `allocation` grants the other attributes.
    pub fn aptitude_bonus(&self, allocation: &Allocation) -> i32 {
        aptitude_bonus(self.context.resolve_aptitude(allocation))
    }

    /// Efficiency of the next point in `key`.
    pub fn gain(&self, allocation: &Allocation, key: AttributeKey, bonus: i32) -> f64 {
        self.context.marginal_gain(key, allocation.get(key), bonus)
    }

    /// Scaled value of `key` under `allocation`.
    pub fn scaled(&self, allocation: &Allocation, key: AttributeKey, bonus: i32) -> i32 {
        self.context.scaled_value(key, allocation.get(key), bonus)
    }

    /// Full two-phase evaluation.
    pub fn evaluate(&self, allocation: &Allocation) -> ScaledStats {
        self.context.evaluate(allocation)
    }

    pub fn health(&self, stats: &ScaledStats) -> i32 {
        self.data.health(stats, self.request.level)
    }

    pub fn resource_pool(&self, stats: &ScaledStats) -> i32 {
        self.data.resource_pool(stats, self.request.level)
    }

    /// Points still unspent in `allocation`.
    pub fn unspent(&self, allocation: &Allocation) -> u32 {
        self.budget.saturating_sub(allocation.total())
    }
}
