//! Extraction configuration
//!
//! Every naming constant and marker the extractor relies on lives here so a
//! workbook family with slightly different conventions can be read with a
//! YAML override file instead of a code change. Unset keys keep their defaults.
//!
//! ```yaml
//! items_table: Buildings
//! min_major_version: 5
//! custom_zone_prefix: User
//! legacy_perils:
//!   Quake: earthquake
//! ```

use crate::error::{ExtractError, ExtractResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Attribute names written as plain scalars instead of `{value}` wrappers
pub const SIMPLE_FIELDS: &[&str] = &[
    "item_key",
    "building_counter",
    "sheet_name",
    "sheet_row_number",
    "parsing_sheet_name",
    "parsing_sheet_row_number",
    "integration_results",
    "integration_messages",
    "extra",
    "reliability",
    "reliability_reason",
    "orig",
    "zones",
    "external_data",
    "external_data_inputs",
    "internal_data",
    "ping_viewer_url",
    "ping_pli_url",
];

/// Legacy peril abbreviations and the canonical identifiers they stand for
pub const LEGACY_PERILS: &[(&str, &str)] = &[
    ("EQ", "earthquake"),
    ("FL", "flood"),
    ("NS", "named_storm"),
    ("Wind", "named_storm"),
    ("SCS", "severe_convective_storm"),
    ("WF", "wildfire"),
    ("TR", "terrorism"),
    ("FFEQ", "fire_following_earthquake"),
    ("SS", "storm_surge"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Table holding one row per location/building
    pub items_table: String,
    /// Reference table listing extra-data fields (`Label`, `Excel Defined Name`)
    pub extra_data_range: String,
    pub client_name_property: String,
    pub identifier_property: String,
    pub format_name_property: String,
    /// Custom property carrying the policy terms schema version (e.g. `v4.1`)
    pub version_property: String,
    pub version_prefix: String,
    pub min_major_version: u32,
    /// Hard cap on layer discovery
    pub max_layers: u32,
    /// Workbook-level limit used when a layer has no limit of its own
    pub total_tiv_range: String,
    /// Peril group label marking a subperil as excluded
    pub peril_exclusion_marker: String,
    /// Zone `Include` value marking a zone as excluded
    pub zone_exclusion_marker: String,
    /// Zone tokens with this prefix take their key from the caption cell
    pub custom_zone_prefix: String,
    pub legacy_perils: IndexMap<String, String>,
    pub simple_fields: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            items_table: "Locations".to_string(),
            extra_data_range: "p_extra_data_fields".to_string(),
            client_name_property: "Ping Client Name".to_string(),
            identifier_property: "Ping Identifier".to_string(),
            format_name_property: "Ping Format Name".to_string(),
            version_property: "Ping Policy Terms Version".to_string(),
            version_prefix: "v".to_string(),
            min_major_version: 4,
            max_layers: 999,
            total_tiv_range: "p_TotalTIV".to_string(),
            peril_exclusion_marker: "Excluded".to_string(),
            zone_exclusion_marker: "Exclude".to_string(),
            custom_zone_prefix: "Custom".to_string(),
            legacy_perils: LEGACY_PERILS
                .iter()
                .map(|(legacy, canonical)| (legacy.to_string(), canonical.to_string()))
                .collect(),
            simple_fields: SIMPLE_FIELDS.iter().map(|field| field.to_string()).collect(),
        }
    }
}

impl ExtractConfig {
    /// Load a YAML override file on top of the defaults
    pub fn from_file(path: &Path) -> ExtractResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ExtractError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> ExtractResult<Self> {
        let config: ExtractConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ExtractResult<()> {
        if self.items_table.trim().is_empty() {
            return Err(ExtractError::Config("items_table must not be empty".to_string()));
        }
        if self.max_layers == 0 {
            return Err(ExtractError::Config("max_layers must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Canonical peril identifier for a token; unknown tokens pass through
    pub fn canonical_peril(&self, token: &str) -> String {
        self.legacy_perils
            .get(token)
            .cloned()
            .unwrap_or_else(|| token.to_string())
    }
}
