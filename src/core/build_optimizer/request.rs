//! Optimization request types.
//!
//! An [`OptimizationRequest`] carries everything one optimization run reads:
//! budget, race and classes, the build goal, the optimization mode, custom
//! weight sliders or attribute targets, flat bonuses from outside the point
//! pool, and hard constraints. It is never mutated during a run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use super::attributes::{AttributeKey, AttributeMap};
use super::error::{OptimizerError, Result};

/// Points granted per character level.
pub const POINTS_PER_LEVEL: u32 = 4;

/// Largest point budget a character can reach.
pub const MAX_POINT_BUDGET: u32 = 240;

/// Highest value a custom weight slider accepts.
pub const SLIDER_MAX: u8 = 10;

/// Point budget for a character level.
pub fn point_budget_for_level(level: u32) -> u32 {
    level.saturating_mul(POINTS_PER_LEVEL).min(MAX_POINT_BUDGET)
}

// ============================================================================
// Mode & sliders
// ============================================================================

/// How candidates are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationMode {
    /// Thresholds and priorities from the build goal, plus custom sliders.
    #[default]
    WeightDirected,
    /// Explicit target values per attribute.
    TargetDirected,
}

/// Named preference sliders that shift priority toward specific attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomWeight {
    CriticalFocus,
    Survivability,
    SummonFocus,
    SpellPower,
    PhysicalPower,
    Mobility,
    Versatility,
}

impl CustomWeight {
    pub const ALL: [CustomWeight; 7] = [
        Self::CriticalFocus,
        Self::Survivability,
        Self::SummonFocus,
        Self::SpellPower,
        Self::PhysicalPower,
        Self::Mobility,
        Self::Versatility,
    ];

    /// Attributes this slider pushes, with their relative weight (0-10 scale).
    pub fn contributions(self) -> &'static [(AttributeKey, f64)] {
        use AttributeKey::*;
        match self {
            Self::CriticalFocus => &[(Luc, 10.0), (Gui, 8.0)],
            Self::Survivability => &[(Vit, 10.0), (Def, 7.0), (Res, 7.0)],
            Self::SummonFocus => &[(Fai, 10.0), (San, 6.0)],
            Self::SpellPower => &[(Wil, 10.0), (San, 5.0)],
            Self::PhysicalPower => &[(Str, 10.0), (Ski, 6.0)],
            Self::Mobility => &[(Cel, 10.0), (Ski, 4.0)],
            Self::Versatility => &[(Apt, 10.0)],
        }
    }

    /// Display label ("critical focus").
    pub fn label(self) -> &'static str {
        match self {
            Self::CriticalFocus => "critical focus",
            Self::Survivability => "survivability",
            Self::SummonFocus => "summon focus",
            Self::SpellPower => "spell power",
            Self::PhysicalPower => "physical power",
            Self::Mobility => "mobility",
            Self::Versatility => "versatility",
        }
    }
}

impl fmt::Display for CustomWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Bonuses & constraints
// ============================================================================

/// Percentage growth bonus on STR and WIL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PercentBonus {
    pub units: u32,
}

/// Contributions that do not come out of the point budget.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatBonuses {
    /// Player-chosen base adjustments, counted with the racial value.
    pub custom_base: AttributeMap<i32>,
    /// History, astrology, stamps, talents, food and class passives, summed.
    pub pre_cap: AttributeMap<i32>,
    /// Flat direct bonus.
    pub custom: AttributeMap<i32>,
    /// Percentage bonus source, if active.
    pub percent: Option<PercentBonus>,
}

/// Hard constraints reserved before any priority-driven distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HardConstraints {
    /// Minimum derived hit points.
    pub min_health: Option<i32>,
    /// Number of summons the build must support.
    pub summon_goal: Option<u32>,
    /// Fixed final Aptitude when multiclassing.
    pub aptitude_target: Option<i32>,
}

// ============================================================================
// OptimizationRequest
// ============================================================================

/// Input to one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub level: u32,
    /// Points to distribute. Clamped to [`MAX_POINT_BUDGET`].
    pub budget: u32,
    pub race: String,
    #[serde(default)]
    pub subrace: Option<String>,
    pub main_class: String,
    pub sub_class: String,
    pub build_goal: String,
    #[serde(default)]
    pub mode: OptimizationMode,
    /// Slider positions, 0-10.
    #[serde(default)]
    pub custom_weights: BTreeMap<CustomWeight, u8>,
    /// Named target values for target-directed mode.
    #[serde(default)]
    pub targets: BTreeMap<AttributeKey, i32>,
    #[serde(default)]
    pub bonuses: FlatBonuses,
    #[serde(default)]
    pub constraints: HardConstraints,
}

impl OptimizationRequest {
    /// Request with the level's default budget and the same class in both slots.
    pub fn new(
        level: u32,
        race: impl Into<String>,
        class: impl Into<String>,
        build_goal: impl Into<String>,
    ) -> Self {
        let class = class.into();
        Self {
            level,
            budget: point_budget_for_level(level),
            race: race.into(),
            subrace: None,
            main_class: class.clone(),
            sub_class: class,
            build_goal: build_goal.into(),
            mode: OptimizationMode::default(),
            custom_weights: BTreeMap::new(),
            targets: BTreeMap::new(),
            bonuses: FlatBonuses::default(),
            constraints: HardConstraints::default(),
        }
    }

    pub fn with_subrace(mut self, subrace: impl Into<String>) -> Self {
        self.subrace = Some(subrace.into());
        self
    }

    pub fn with_sub_class(mut self, class: impl Into<String>) -> Self {
        self.sub_class = class.into();
        self
    }

    pub fn with_budget(mut self, budget: u32) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_mode(mut self, mode: OptimizationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_custom_weight(mut self, weight: CustomWeight, value: u8) -> Self {
        self.custom_weights.insert(weight, value);
        self
    }

    pub fn with_target(mut self, key: AttributeKey, value: i32) -> Self {
        self.targets.insert(key, value);
        self
    }

    pub fn with_bonuses(mut self, bonuses: FlatBonuses) -> Self {
        self.bonuses = bonuses;
        self
    }

    pub fn with_constraints(mut self, constraints: HardConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Main and sub class are the same class.
    pub fn is_monoclass(&self) -> bool {
        self.main_class.eq_ignore_ascii_case(&self.sub_class)
    }

    /// Budget after clamping.
    pub fn effective_budget(&self) -> u32 {
        self.budget.min(MAX_POINT_BUDGET)
    }

    /// Slider value for `weight`, clamped to 0-10.
    pub fn slider(&self, weight: CustomWeight) -> u8 {
        self.custom_weights
            .get(&weight)
            .copied()
            .unwrap_or(0)
            .min(SLIDER_MAX)
    }

    /// Sliders set above zero, in declaration order.
    pub fn active_sliders(&self) -> impl Iterator<Item = (CustomWeight, u8)> + '_ {
        CustomWeight::ALL
            .into_iter()
            .map(|weight| (weight, self.slider(weight)))
            .filter(|(_, value)| *value > 0)
    }

    /// Aptitude target, applied only when multiclassing.
    pub fn multiclass_aptitude_target(&self) -> Option<i32> {
        if self.is_monoclass() {
            None
        } else {
            self.constraints.aptitude_target
        }
    }

    /// Parse a YAML request document. `label` names the source in errors.
    pub fn from_yaml_str(label: &str, yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| OptimizerError::parse(label, e))
    }

    /// Read and parse a YAML request file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&path.display().to_string(), &yaml)
    }
}
