//! Compile-time bundled game data.
//!
//! Bundles the race, class and build-goal YAML tables under `assets/catalog/`
//! into the binary via `include_str!`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use statforge::core::assets::AssetLoader;
//!
//! let catalog = AssetLoader::load_catalog();
//! let tank = catalog.build_goal("tank");
//! ```

use tracing::{debug, warn};

use super::build_optimizer::catalog::Catalog;

// ============================================================================
// Compile-time bundled YAML: Catalog (3)
// ============================================================================

const CATALOG_RACES: &str = include_str!("../../assets/catalog/races.yaml");
const CATALOG_CLASSES: &str = include_str!("../../assets/catalog/classes.yaml");
const CATALOG_BUILD_GOALS: &str = include_str!("../../assets/catalog/build_goals.yaml");

/// All catalog YAML sources with labels for error reporting.
const CATALOG_SOURCES: &[(&str, &str)] = &[
    ("catalog/races", CATALOG_RACES),
    ("catalog/classes", CATALOG_CLASSES),
    ("catalog/build_goals", CATALOG_BUILD_GOALS),
];

// ============================================================================
// AssetLoader
// ============================================================================

/// Loads bundled YAML assets into typed Rust structs.
///
/// Parse failures log a warning and skip the invalid file rather than
/// panicking.
pub struct AssetLoader;

impl AssetLoader {
    /// Merge every bundled catalog table into one [`Catalog`].
    pub fn load_catalog() -> Catalog {
        let mut catalog = Catalog::new();

        for (label, yaml) in CATALOG_SOURCES {
            match Catalog::from_yaml_str(label, yaml) {
                Ok(part) => {
                    debug!(
                        file = label,
                        races = part.races.len(),
                        classes = part.classes.len(),
                        goals = part.build_goals.len(),
                        "loaded catalog table"
                    );
                    catalog.merge(part);
                }
                Err(e) => {
                    warn!(file = label, error = %e, "failed to parse catalog YAML");
                }
            }
        }

        debug!(
            races = catalog.races.len(),
            classes = catalog.classes.len(),
            goals = catalog.build_goals.len(),
            "catalog loaded"
        );
        catalog
    }

    /// Raw bundled build-goal YAML, for users starting their own catalog.
    pub fn build_goals_yaml() -> &'static str {
        CATALOG_BUILD_GOALS
    }

    /// Count of bundled catalog files.
    pub const CATALOG_FILE_COUNT: usize = CATALOG_SOURCES.len();
}
