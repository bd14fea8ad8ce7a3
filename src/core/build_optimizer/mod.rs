//! Attribute build optimizer.
//!
//! Recommends how to spend a character's attribute points across the twelve
//! attributes, given race, classes, a build goal and optional preferences.
//!
//! # Overview
//!
//! - **Scaling engine** ([`scaling`]): turns raw contributions into effective
//!   values, linear up to a soft cap and with diminishing returns past it.
//! - **Optimizer**: a greedy seed ([`seed`]), constrained random candidates
//!   ([`sampler`]) and a population-based refinement loop ([`evolve`]) scored
//!   by [`scoring`].
//!
//! # Architecture
//!
//! ```text
//!  OptimizationRequest + GameData + OptimizerParams
//!                    |
//!                    v
//!  +---------------------------------------------+
//!  | SearchSpace (context, priorities, floors)   |
//!  +---------------------------------------------+
//!        |              |                 |
//!        v              v                 v
//!   greedy_seed   random_candidate   mutate/repair
//!        \              |                 /
//!         +------ evolve (score) --------+
//!                       |
//!                       v
//!            report::finalize -> OptimizationResult
//! ```
//!
//! The optimizer never bypasses the scaling engine: every value it compares
//! comes from [`scaling::BuildContext`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use statforge::core::assets::AssetLoader;
//! use statforge::core::build_optimizer::{optimize, OptimizationRequest, OptimizerParams};
//!
//! let catalog = AssetLoader::load_catalog();
//! let request = OptimizationRequest::new(60, "dwarf", "Knight", "tank");
//! let result = optimize(&request, &catalog, &OptimizerParams::default().with_seed(7))?;
//! println!("{:?}", result.allocation);
//! ```

pub mod attributes;
pub mod catalog;
pub mod error;
pub mod evolve;
pub mod floors;
pub mod params;
pub mod priority;
pub mod report;
pub mod request;
pub mod sampler;
pub mod scaling;
pub mod scoring;
pub mod seed;
pub mod space;

pub use attributes::{Allocation, AttributeKey, AttributeMap, ATTRIBUTE_COUNT};
pub use catalog::{
    BuildGoal, Catalog, ClassProfile, EntityModifiers, EquipmentCategory, GameData, RaceEntry,
    Threshold,
};
pub use error::{OptimizerError, Result};
pub use params::{OptimizerParams, ScoringWeights};
pub use request::{
    point_budget_for_level, CustomWeight, FlatBonuses, HardConstraints, OptimizationMode,
    OptimizationRequest, PercentBonus,
};
pub use scaling::{scale, BuildContext, Contributions, ScaledStats};
pub use space::SearchSpace;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Outcome of one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Best allocation found.
    pub allocation: Allocation,
    /// Points spent by `allocation`.
    pub total_points: u32,
    pub score: f64,
    /// Resolved attribute values for `allocation`.
    pub stats: ScaledStats,
    /// Derived hit points for `allocation`.
    pub health: i32,
    /// Derived resource pool for `allocation`.
    pub resource_pool: i32,
    pub generations: usize,
    pub stopped_early: bool,
    /// Why the allocation looks the way it does.
    pub reasoning: Vec<String>,
    /// Unmet thresholds, inefficiencies and advisory incompatibilities.
    pub warnings: Vec<String>,
}

/// Optimize with an RNG seeded from `params.seed` (entropy when unset).
///
/// Fails only when the request names a build goal `data` does not know.
pub fn optimize(
    request: &OptimizationRequest,
    data: &dyn GameData,
    params: &OptimizerParams,
) -> Result<OptimizationResult> {
    let mut rng = match params.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    optimize_with_rng(request, data, params, &mut rng)
}

/// Optimize with a caller-supplied RNG.
pub fn optimize_with_rng<R: Rng + ?Sized>(
    request: &OptimizationRequest,
    data: &dyn GameData,
    params: &OptimizerParams,
    rng: &mut R,
) -> Result<OptimizationResult> {
    let goal = data
        .build_goal(&request.build_goal)
        .ok_or_else(|| OptimizerError::UnknownBuildGoal {
            id: request.build_goal.clone(),
            available: data.build_goal_ids(),
        })?;

    tracing::info!(
        goal = %goal.id,
        race = %request.race,
        main_class = %request.main_class,
        sub_class = %request.sub_class,
        budget = request.effective_budget(),
        mode = ?request.mode,
        "starting build optimization"
    );

    let space = SearchSpace::new(request, goal, data, params);
    let seed = seed::greedy_seed(&space);
    let outcome = evolve::evolve(&space, seed, rng);

    Ok(report::finalize(&space, outcome))
}
