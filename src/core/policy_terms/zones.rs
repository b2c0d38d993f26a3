//! Zone groups: `p_<group>_<zone>_Caption` with per-zone `Sublimit`, `Ded`,
//! `MaxDed`, `PerLocDed`, `PerLocDedType` and `Include` cells.

use super::NamedCells;
use crate::config::ExtractConfig;
use crate::core::name_scanner::{compile, scan, ZONE_CAPTION_PATTERN};
use crate::error::ExtractResult;
use crate::excel::{DefinedName, Workbook};
use crate::types::ZoneTerms;
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Zone group → zone → terms
pub type ZoneSchedule = IndexMap<String, IndexMap<String, ZoneTerms>>;

pub fn read_zones<W: Workbook + ?Sized>(
    cells: &NamedCells<'_, W>,
    names: &[DefinedName],
    config: &ExtractConfig,
) -> ExtractResult<ZoneSchedule> {
    let pattern = compile(ZONE_CAPTION_PATTERN)?;
    let mut schedule = ZoneSchedule::new();

    for caption in scan(names, &pattern) {
        let group = caption.capture(1);
        let zone = caption.capture(2);
        let zones = schedule.entry(group.to_string()).or_default();

        let prefix = format!("p_{}_{}_", group, zone);
        let field = |suffix: &str| format!("{}{}", prefix, suffix);
        let terms = ZoneTerms {
            sublimit: cells.number(&field("Sublimit")),
            min_deductible: cells.number(&field("Ded")),
            max_deductible: cells.number(&field("MaxDed")),
            location_deductible: cells.number(&field("PerLocDed")),
            location_deductible_type: cells.text(&field("PerLocDedType")),
            is_excluded: cells
                .text(&field("Include"))
                .is_some_and(|include| include == config.zone_exclusion_marker),
        };

        if !terms.is_applicable() {
            debug!(group, zone, "Zone carries no terms, dropping");
            continue;
        }

        let key = if zone.starts_with(&config.custom_zone_prefix) {
            cells.text(&caption.name).unwrap_or_else(|| zone.to_string())
        } else {
            zone.to_string()
        };
        if zones.contains_key(&key) {
            warn!(group, zone, key = %key, "Zone key already taken, keeping the first");
            continue;
        }
        zones.insert(key, terms);
    }

    Ok(schedule)
}
