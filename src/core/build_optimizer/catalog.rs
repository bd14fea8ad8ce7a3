//! Read-only game data consumed by the optimizer.
//!
//! The optimizer never owns race, class or build-goal tables. It reads them
//! through the [`GameData`] trait, which also carries the derived health and
//! resource-pool formulas. [`Catalog`] is the in-memory implementation, filled
//! from YAML (bundled assets or a user file).
//!
//! Missing entries are not errors: an unknown race or class contributes zero
//! to every attribute. Only build goals are mandatory, and that check lives in
//! the optimizer entry point.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::attributes::{AttributeKey, AttributeMap};
use super::error::{OptimizerError, Result};
use super::scaling::ScaledStats;

// ============================================================================
// Derived-stat formulas
// ============================================================================

/// Final Faith required per summon.
pub const FAITH_PER_SUMMON: i32 = 12;

/// Resource pool consumed per active summon.
pub const POOL_PER_SUMMON: i32 = 40;

/// Default derived hit points.
pub fn standard_health(stats: &ScaledStats, level: u32) -> i32 {
    (40 + 8 * stats.get(AttributeKey::Vit)
        + 2 * stats.get(AttributeKey::Def)
        + stats.get(AttributeKey::Str))
    .saturating_add(saturating_product(level, 4))
}

/// Default derived resource pool (mana / summon upkeep).
pub fn standard_resource_pool(stats: &ScaledStats, level: u32) -> i32 {
    (20 + 5 * stats.get(AttributeKey::San)
        + 3 * stats.get(AttributeKey::Fai)
        + 2 * stats.get(AttributeKey::Wil))
    .saturating_add(saturating_product(level, 2))
}

/// Final Faith needed to field `summons` summons.
pub fn faith_for_summons(summons: u32) -> i32 {
    saturating_product(summons, FAITH_PER_SUMMON)
}

/// Resource pool needed to sustain `summons` summons.
pub fn pool_for_summons(summons: u32) -> i32 {
    saturating_product(summons, POOL_PER_SUMMON)
}

/// `count * factor`, pinned at `i32::MAX` for request values too large to fit.
fn saturating_product(count: u32, factor: i32) -> i32 {
    i32::try_from(count)
        .unwrap_or(i32::MAX)
        .saturating_mul(factor)
}

// ============================================================================
// Entity tables
// ============================================================================

/// Attribute contributions of a race or subrace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntityModifiers {
    /// Starting value per attribute.
    #[serde(default)]
    pub base: AttributeMap<i32>,
    /// Flat racial modifiers.
    #[serde(default)]
    pub bonus: AttributeMap<i32>,
}

impl EntityModifiers {
    /// Sum of two modifier sets (race + subrace).
    pub fn combined(&self, other: &EntityModifiers) -> EntityModifiers {
        EntityModifiers {
            base: self.base.plus(&other.base),
            bonus: self.bonus.plus(&other.bonus),
        }
    }
}

/// A race with optional subraces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaceEntry {
    #[serde(flatten)]
    pub modifiers: EntityModifiers,
    #[serde(default)]
    pub subraces: BTreeMap<String, EntityModifiers>,
}

/// Equipment families a class can wield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentCategory {
    Sword,
    Greatsword,
    Axe,
    Spear,
    Dagger,
    Bow,
    Gauntlet,
    Whip,
    Shield,
    Staff,
    Wand,
    Tome,
    Relic,
}

impl EquipmentCategory {
    /// Attributes this equipment scales with, strongest first.
    pub fn favored_attributes(self) -> &'static [AttributeKey] {
        use AttributeKey::*;
        match self {
            Self::Sword => &[Str, Ski],
            Self::Greatsword => &[Str],
            Self::Axe => &[Str, Gui],
            Self::Spear => &[Str, Cel],
            Self::Dagger => &[Ski, Luc],
            Self::Bow => &[Ski, Cel],
            Self::Gauntlet => &[Str, Cel],
            Self::Whip => &[Gui, Ski],
            Self::Shield => &[Def, Vit],
            Self::Staff => &[Wil, San],
            Self::Wand => &[Wil],
            Self::Tome => &[San, Fai],
            Self::Relic => &[Fai, Res],
        }
    }
}

/// Attribute bonuses and equipment access of a class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassProfile {
    #[serde(default)]
    pub bonuses: AttributeMap<i32>,
    #[serde(default)]
    pub equipment: Vec<EquipmentCategory>,
}

// ============================================================================
// Build goals
// ============================================================================

/// Target band for one attribute's scaled value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Threshold {
    #[serde(default, rename = "min")]
    pub minimum: Option<i32>,
    #[serde(default)]
    pub ideal: Option<i32>,
    #[serde(default, rename = "max")]
    pub maximum: Option<i32>,
}

/// A named build archetype ("tank", "glass cannon", ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildGoal {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Priority per attribute, 0-10.
    #[serde(default)]
    pub priorities: AttributeMap<u8>,
    #[serde(default)]
    pub thresholds: BTreeMap<AttributeKey, Threshold>,
    /// Class name to compatibility score, 0-10. Advisory only.
    #[serde(default)]
    pub compatibility: BTreeMap<String, u8>,
}

impl BuildGoal {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_priority(mut self, key: AttributeKey, priority: u8) -> Self {
        self.priorities[key] = priority.min(10);
        self
    }

    pub fn with_threshold(mut self, key: AttributeKey, threshold: Threshold) -> Self {
        self.thresholds.insert(key, threshold);
        self
    }

    pub fn with_compatibility(mut self, class: impl Into<String>, score: u8) -> Self {
        self.compatibility.insert(class.into(), score.min(10));
        self
    }

    /// Clamped priority for `key`.
    pub fn priority(&self, key: AttributeKey) -> u8 {
        self.priorities[key].min(10)
    }

    /// Threshold for `key`, if one is declared.
    pub fn threshold(&self, key: AttributeKey) -> Option<&Threshold> {
        self.thresholds.get(&key)
    }

    /// Compatibility score for `class`, case-insensitive.
    pub fn compatibility_with(&self, class: &str) -> Option<u8> {
        lookup(&self.compatibility, class).map(|score| (*score).min(10))
    }
}

// ============================================================================
// GameData trait
// ============================================================================

/// Read-only lookups the optimizer needs from the surrounding application.
pub trait GameData {
    /// Combined race + subrace modifiers. Unknown names contribute zero.
    fn race_modifiers(&self, race: &str, subrace: Option<&str>) -> EntityModifiers;

    /// Class bonuses and equipment. Unknown classes contribute nothing.
    fn class_profile(&self, class: &str) -> ClassProfile;

    /// Build goal by identifier.
    fn build_goal(&self, id: &str) -> Option<&BuildGoal>;

    /// All known build goal identifiers.
    fn build_goal_ids(&self) -> Vec<String>;

    /// Derived hit points for resolved stats.
    fn health(&self, stats: &ScaledStats, level: u32) -> i32 {
        standard_health(stats, level)
    }

    /// Derived resource pool for resolved stats.
    fn resource_pool(&self, stats: &ScaledStats, level: u32) -> i32 {
        standard_resource_pool(stats, level)
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// In-memory game data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub races: BTreeMap<String, RaceEntry>,
    #[serde(default)]
    pub classes: BTreeMap<String, ClassProfile>,
    #[serde(default)]
    pub build_goals: Vec<BuildGoal>,
}

impl Catalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML catalog document. `label` names the source in errors.
    pub fn from_yaml_str(label: &str, yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| OptimizerError::parse(label, e))
    }

    /// Read and parse a YAML catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&path.display().to_string(), &yaml)
    }

    /// Add every entry from `other`; its entries win on name clashes.
    pub fn merge(&mut self, other: Catalog) {
        self.races.extend(other.races);
        self.classes.extend(other.classes);
        for goal in other.build_goals {
            self.insert_goal(goal);
        }
    }

    pub fn with_race(mut self, name: impl Into<String>, race: RaceEntry) -> Self {
        self.races.insert(name.into(), race);
        self
    }

    pub fn with_class(mut self, name: impl Into<String>, class: ClassProfile) -> Self {
        self.classes.insert(name.into(), class);
        self
    }

    pub fn with_build_goal(mut self, goal: BuildGoal) -> Self {
        self.insert_goal(goal);
        self
    }

    fn insert_goal(&mut self, goal: BuildGoal) {
        match self.build_goals.iter_mut().find(|g| g.id == goal.id) {
            Some(existing) => *existing = goal,
            None => self.build_goals.push(goal),
        }
    }
}

impl GameData for Catalog {
    fn race_modifiers(&self, race: &str, subrace: Option<&str>) -> EntityModifiers {
        let Some(entry) = lookup(&self.races, race) else {
            tracing::debug!(race, "race not in catalog, using zero modifiers");
            return EntityModifiers::default();
        };

        match subrace.and_then(|name| lookup(&entry.subraces, name)) {
            Some(sub) => entry.modifiers.combined(sub),
            None => entry.modifiers,
        }
    }

    fn class_profile(&self, class: &str) -> ClassProfile {
        lookup(&self.classes, class).cloned().unwrap_or_else(|| {
            tracing::debug!(class, "class not in catalog, using empty profile");
            ClassProfile::default()
        })
    }

    fn build_goal(&self, id: &str) -> Option<&BuildGoal> {
        self.build_goals
            .iter()
            .find(|goal| goal.id.eq_ignore_ascii_case(id))
    }

    fn build_goal_ids(&self) -> Vec<String> {
        self.build_goals.iter().map(|goal| goal.id.clone()).collect()
    }
}

/// Exact key match first, then case-insensitive.
fn lookup<'a, V>(map: &'a BTreeMap<String, V>, name: &str) -> Option<&'a V> {
    map.get(name).or_else(|| {
        map.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}
