//! Tunable search and scoring constants.
//!
//! Defaults reproduce the reference behaviour; tests shrink the population
//! and generation count to keep runs fast.

use serde::{Deserialize, Serialize};

/// Default population size.
pub const DEFAULT_POPULATION_SIZE: usize = 30;

/// Default generation cap.
pub const DEFAULT_MAX_GENERATIONS: usize = 500;

/// Default number of generations without improvement before stopping.
pub const DEFAULT_STAGNATION_LIMIT: usize = 100;

/// Evolutionary search parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerParams {
    /// Candidates per generation.
    pub population_size: usize,
    /// Hard generation cap.
    pub max_generations: usize,
    /// Stop after this many generations without a meaningful improvement.
    pub stagnation_limit: usize,
    /// Smallest best-score gain that counts as an improvement.
    pub improvement_threshold: f64,
    /// Share of each generation carried over unchanged.
    pub elite_fraction: f64,
    /// Share of each generation produced by mutating elites.
    pub mutation_fraction: f64,
    /// Per-attribute mutation probability.
    pub mutation_rate: f64,
    /// Mutation deltas are drawn from `-span..=span`.
    pub mutation_span: i32,
    /// Probability a random sampler skips a low-efficiency increment.
    pub random_skip_bias: f64,
    /// Marginal efficiency below which the sampler may skip.
    pub random_efficiency_floor: f64,
    /// Invested points allowed per attribute, on top of the hard cap.
    pub max_raw_investment: u32,
    /// Seed for reproducible runs; entropy when unset.
    pub seed: Option<u64>,
    pub scoring: ScoringWeights,
}

impl Default for OptimizerParams {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            max_generations: DEFAULT_MAX_GENERATIONS,
            stagnation_limit: DEFAULT_STAGNATION_LIMIT,
            improvement_threshold: 1.0,
            elite_fraction: 0.3,
            mutation_fraction: 0.6,
            mutation_rate: 0.1,
            mutation_span: 3,
            random_skip_bias: 0.7,
            random_efficiency_floor: 0.3,
            max_raw_investment: 80,
            seed: None,
            scoring: ScoringWeights::default(),
        }
    }
}

impl OptimizerParams {
    /// Small, seeded configuration for tests and quick previews.
    pub fn quick(seed: u64) -> Self {
        Self {
            population_size: 12,
            max_generations: 60,
            stagnation_limit: 20,
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Population size, at least 2.
    pub fn population(&self) -> usize {
        self.population_size.max(2)
    }

    /// Number of elites kept per generation, at least 1.
    pub fn elite_count(&self) -> usize {
        let count = (self.population() as f64 * self.elite_fraction.clamp(0.0, 1.0)).round() as usize;
        count.clamp(1, self.population())
    }

    /// Number of mutated children per generation.
    pub fn mutant_count(&self) -> usize {
        let count = (self.population() as f64 * self.mutation_fraction.clamp(0.0, 1.0)).round() as usize;
        count.min(self.population() - self.elite_count())
    }
}

/// Coefficients of the scoring function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Reward per met minimum threshold.
    pub threshold_met: f64,
    /// Penalty per point of shortfall below a minimum.
    pub threshold_shortfall: f64,
    /// Peak bonus at exactly the ideal value.
    pub ideal_bonus: f64,
    /// Penalty per point above a maximum.
    pub overshoot: f64,
    /// Multiplier on invested points times combined priority.
    pub priority_factor: f64,
    /// Reward when a summon goal is fully supported.
    pub summon_bonus: f64,
    /// Penalty when Faith is below the summon floor.
    pub faith_floor_penalty: f64,
    /// Flat penalty when health is below the configured minimum.
    pub health_floor_penalty: f64,
    /// Additional penalty per missing hit point.
    pub health_shortfall: f64,
    /// Penalty per unspent point.
    pub unused_point: f64,
    /// Penalty per Aptitude point past the last multiple of 6.
    pub aptitude_waste: f64,
    /// Reward per met target in target-directed mode.
    pub target_met: f64,
    /// Penalty per point of shortfall below a target.
    pub target_shortfall: f64,
    /// Penalty per point spent over the budget.
    pub budget_overflow: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            threshold_met: 100.0,
            threshold_shortfall: 10.0,
            ideal_bonus: 50.0,
            overshoot: 5.0,
            priority_factor: 0.1,
            summon_bonus: 300.0,
            faith_floor_penalty: 500.0,
            health_floor_penalty: 200.0,
            health_shortfall: 2.0,
            unused_point: 20.0,
            aptitude_waste: 5.0,
            target_met: 100.0,
            target_shortfall: 10.0,
            budget_overflow: 1000.0,
        }
    }
}
