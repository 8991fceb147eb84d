//! Listing-text to fulfillment SKU table.
//!
//! The table is data: `config/catalog.yaml` is compiled into the binary and
//! can be replaced at start-up with `ORDERLINK_CATALOG_PATH`. Lookups never
//! fail; a listing that resolves to nothing yields [`Catalog::fallback`].

mod resolve;

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

pub use resolve::Resolution;

const EMBEDDED_CATALOG: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../config/catalog.yaml"
));

/// One plan type inside a region, e.g. "daily 1GB then throttled".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlanRule {
    /// Short identifier used in logs and the `catalog show` listing.
    pub tag: String,
    /// Alternative phrase sets. The plan applies when every phrase of any one
    /// set occurs in the listing text.
    #[serde(rename = "match")]
    pub phrase_sets: Vec<Vec<String>>,
    /// Exact day count to catalog code. Keys are sparse.
    pub durations: BTreeMap<i64, String>,
}

impl PlanRule {
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.phrase_sets
            .iter()
            .any(|set| set.iter().all(|phrase| text.contains(phrase.as_str())))
    }

    #[must_use]
    pub fn code_for(&self, duration_days: i64) -> Option<&str> {
        self.durations.get(&duration_days).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegionRule {
    pub name: String,
    /// Native name, English name and abbreviations. Any one is enough.
    pub gates: Vec<String>,
    pub plans: Vec<PlanRule>,
}

impl RegionRule {
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.gates.iter().any(|gate| text.contains(gate.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Catalog {
    /// Sentinel returned for anything that does not resolve. Never a real SKU.
    pub fallback: String,
    /// Evaluation order is declaration order.
    pub regions: Vec<RegionRule>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the embedded file fails to parse or validate.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_yaml_str(EMBEDDED_CATALOG)
    }

    /// Load and validate a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load the file at `path` when given, otherwise the embedded catalog.
    ///
    /// # Errors
    ///
    /// See [`Catalog::load`] and [`Catalog::embedded`].
    pub fn load_or_embedded(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::embedded(),
        }
    }

    /// Parse and validate a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::CatalogParse` for malformed YAML and
    /// `ConfigError::Validation` for structurally invalid tables.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let catalog: Catalog = serde_yaml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// First region, in declaration order, whose gate occurs in `text`.
    #[must_use]
    pub fn region_for(&self, text: &str) -> Option<&RegionRule> {
        self.regions.iter().find(|region| region.matches(text))
    }

    /// Number of `(region, plan, duration)` entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.regions
            .iter()
            .flat_map(|r| &r.plans)
            .map(|p| p.durations.len())
            .sum()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fallback = self.fallback.trim();
        if fallback.is_empty() {
            return Err(ConfigError::Validation(
                "fallback code must be non-empty".to_string(),
            ));
        }

        let mut seen_regions = HashSet::new();
        for region in &self.regions {
            if region.name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "region name must be non-empty".to_string(),
                ));
            }
            if !seen_regions.insert(region.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate region name: '{}'",
                    region.name
                )));
            }
            if region.gates.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "region '{}' has no gates",
                    region.name
                )));
            }
            if region.gates.iter().any(String::is_empty) {
                return Err(ConfigError::Validation(format!(
                    "region '{}' has an empty gate phrase",
                    region.name
                )));
            }

            for plan in &region.plans {
                validate_plan(&region.name, plan, fallback)?;
            }
        }

        Ok(())
    }
}

fn validate_plan(region: &str, plan: &PlanRule, fallback: &str) -> Result<(), ConfigError> {
    if plan.phrase_sets.is_empty() {
        return Err(ConfigError::Validation(format!(
            "plan '{}' in region '{region}' has no match sets",
            plan.tag
        )));
    }
    if plan
        .phrase_sets
        .iter()
        .any(|set| set.is_empty() || set.iter().any(String::is_empty))
    {
        return Err(ConfigError::Validation(format!(
            "plan '{}' in region '{region}' has an empty phrase set or phrase",
            plan.tag
        )));
    }
    if plan.durations.is_empty() {
        return Err(ConfigError::Validation(format!(
            "plan '{}' in region '{region}' has no durations",
            plan.tag
        )));
    }
    for (days, code) in &plan.durations {
        let code = code.trim();
        if code.is_empty() {
            return Err(ConfigError::Validation(format!(
                "plan '{}' in region '{region}' has an empty code for {days} days",
                plan.tag
            )));
        }
        if code == fallback {
            return Err(ConfigError::Validation(format!(
                "plan '{}' in region '{region}' maps {days} days to the fallback code",
                plan.tag
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
