//! Attribute identifiers and attribute-keyed containers.
//!
//! - [`AttributeKey`]: the twelve character attributes
//! - [`AttributeMap`]: a fixed-size map with one slot per attribute
//! - [`Allocation`]: invested points per attribute
//!
//! # Serialization
//!
//! Keys serialize as their upper-case abbreviation (`"STR"`, `"APT"`, ...).
//! An [`AttributeMap`] serializes as a map; keys missing on input take the
//! default value, so sparse tables in YAML are fine.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use super::error::OptimizerError;

/// Number of attributes in the system.
pub const ATTRIBUTE_COUNT: usize = 12;

// ============================================================================
// AttributeKey
// ============================================================================

/// One of the twelve character attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttributeKey {
    /// Strength
    Str,
    /// Willpower
    Wil,
    /// Skill
    Ski,
    /// Celerity
    Cel,
    /// Defense
    Def,
    /// Resistance
    Res,
    /// Vitality
    Vit,
    /// Faith
    Fai,
    /// Luck
    Luc,
    /// Guile
    Gui,
    /// Sanity
    San,
    /// Aptitude. Every full 6 points of scaled APT adds 1 to every other attribute.
    Apt,
}

impl AttributeKey {
    /// All attributes in declaration order.
    pub const ALL: [AttributeKey; ATTRIBUTE_COUNT] = [
        Self::Str,
        Self::Wil,
        Self::Ski,
        Self::Cel,
        Self::Def,
        Self::Res,
        Self::Vit,
        Self::Fai,
        Self::Luc,
        Self::Gui,
        Self::San,
        Self::Apt,
    ];

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }

    /// Upper-case abbreviation (`"STR"`).
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Str => "STR",
            Self::Wil => "WIL",
            Self::Ski => "SKI",
            Self::Cel => "CEL",
            Self::Def => "DEF",
            Self::Res => "RES",
            Self::Vit => "VIT",
            Self::Fai => "FAI",
            Self::Luc => "LUC",
            Self::Gui => "GUI",
            Self::San => "SAN",
            Self::Apt => "APT",
        }
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Str => "Strength",
            Self::Wil => "Willpower",
            Self::Ski => "Skill",
            Self::Cel => "Celerity",
            Self::Def => "Defense",
            Self::Res => "Resistance",
            Self::Vit => "Vitality",
            Self::Fai => "Faith",
            Self::Luc => "Luck",
            Self::Gui => "Guile",
            Self::San => "Sanity",
            Self::Apt => "Aptitude",
        }
    }

    /// Whether this is the Aptitude attribute.
    #[inline]
    pub fn is_aptitude(self) -> bool {
        self == Self::Apt
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for AttributeKey {
    type Err = OptimizerError;

    /// Accepts abbreviations or full names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|key| {
                key.abbreviation().eq_ignore_ascii_case(needle)
                    || key.display_name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| OptimizerError::UnknownAttribute(s.to_string()))
    }
}

// ============================================================================
// AttributeMap
// ============================================================================

/// One value per attribute, addressed by [`AttributeKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttributeMap<T> {
    values: [T; ATTRIBUTE_COUNT],
}

impl<T> AttributeMap<T> {
    /// Build a map by calling `f` once per attribute.
    pub fn from_fn(mut f: impl FnMut(AttributeKey) -> T) -> Self {
        Self {
            values: AttributeKey::ALL.map(&mut f),
        }
    }

    /// Iterate `(key, &value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (AttributeKey, &T)> + '_ {
        AttributeKey::ALL.into_iter().zip(self.values.iter())
    }

    /// Transform every value, keeping keys.
    pub fn map<U>(&self, mut f: impl FnMut(AttributeKey, &T) -> U) -> AttributeMap<U> {
        AttributeMap::from_fn(|key| f(key, &self[key]))
    }
}

impl<T: Copy> AttributeMap<T> {
    /// Map with every slot set to `value`.
    pub fn splat(value: T) -> Self {
        Self {
            values: [value; ATTRIBUTE_COUNT],
        }
    }

    /// Copy of the value for `key`.
    #[inline]
    pub fn get(&self, key: AttributeKey) -> T {
        self.values[key.slot()]
    }

    /// Overwrite the value for `key`.
    #[inline]
    pub fn set(&mut self, key: AttributeKey, value: T) {
        self.values[key.slot()] = value;
    }
}

impl<T: Copy + std::ops::Add<Output = T>> AttributeMap<T> {
    /// Element-wise sum.
    pub fn plus(&self, other: &Self) -> Self {
        Self::from_fn(|key| self.get(key) + other.get(key))
    }
}

impl<T> Index<AttributeKey> for AttributeMap<T> {
    type Output = T;

    fn index(&self, key: AttributeKey) -> &T {
        &self.values[key.slot()]
    }
}

impl<T> IndexMut<AttributeKey> for AttributeMap<T> {
    fn index_mut(&mut self, key: AttributeKey) -> &mut T {
        &mut self.values[key.slot()]
    }
}

impl<T: Default> FromIterator<(AttributeKey, T)> for AttributeMap<T> {
    fn from_iter<I: IntoIterator<Item = (AttributeKey, T)>>(iter: I) -> Self {
        let mut map = Self::default();
        for (key, value) in iter {
            map[key] = value;
        }
        map
    }
}

impl<T: Serialize> Serialize for AttributeMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ATTRIBUTE_COUNT))?;
        for (key, value) in self.iter() {
            map.serialize_entry(&key, value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de> + Default> Deserialize<'de> for AttributeMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<AttributeKey, T>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

// ============================================================================
// Allocation
// ============================================================================

/// Invested points per attribute.
///
/// Candidates are plain values: the optimizer copies and discards them
/// freely, nothing is shared between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allocation(AttributeMap<u32>);

impl Allocation {
    /// Empty allocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing point map.
    pub fn from_points(points: AttributeMap<u32>) -> Self {
        Self(points)
    }

    /// Points invested in `key`.
    #[inline]
    pub fn get(&self, key: AttributeKey) -> u32 {
        self.0.get(key)
    }

    /// Set the points invested in `key`.
    #[inline]
    pub fn set(&mut self, key: AttributeKey, points: u32) {
        self.0.set(key, points);
    }

    /// Add one point to `key`.
    #[inline]
    pub fn increment(&mut self, key: AttributeKey) {
        self.0[key] += 1;
    }

    /// Remove one point from `key`; no-op at zero.
    #[inline]
    pub fn decrement(&mut self, key: AttributeKey) {
        self.0[key] = self.0[key].saturating_sub(1);
    }

    /// Sum of all invested points.
    pub fn total(&self) -> u32 {
        self.0.iter().map(|(_, points)| *points).sum()
    }

    /// Iterate `(key, points)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (AttributeKey, u32)> + '_ {
        self.0.iter().map(|(key, points)| (key, *points))
    }

    /// Underlying point map.
    pub fn points(&self) -> &AttributeMap<u32> {
        &self.0
    }
}

impl Index<AttributeKey> for Allocation {
    type Output = u32;

    fn index(&self, key: AttributeKey) -> &u32 {
        &self.0[key]
    }
}
