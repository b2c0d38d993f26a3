//! Peril groups
//!
//! Each `p_<token>_Caption` name introduces a subperil. Its `p_<token>_Group`
//! cell names the group whose terms it shares; a blank group or the exclusion
//! marker excludes the subperil instead. Within a group, a token only fills
//! the fields its own cells actually carry, so later tokens never blank out
//! earlier ones. Two tokens with conflicting values: the last one scanned wins.

use super::NamedCells;
use crate::config::ExtractConfig;
use crate::core::name_scanner::{compile, scan, PERIL_CAPTION_PATTERN};
use crate::error::ExtractResult;
use crate::excel::{DefinedName, Workbook};
use crate::types::PerilTerms;
use indexmap::IndexMap;
use tracing::debug;

/// Peril groups plus the subperils excluded from cover
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerilSchedule {
    pub groups: IndexMap<String, PerilTerms>,
    pub excluded: Vec<String>,
}

impl PerilSchedule {
    fn exclude(&mut self, peril: String) {
        if !self.excluded.contains(&peril) {
            self.excluded.push(peril);
        }
    }
}

fn peril_range(token: &str, suffix: &str) -> String {
    format!("p_{}{}", token, suffix)
}

pub fn read_perils<W: Workbook + ?Sized>(
    cells: &NamedCells<'_, W>,
    names: &[DefinedName],
    config: &ExtractConfig,
) -> ExtractResult<PerilSchedule> {
    let pattern = compile(PERIL_CAPTION_PATTERN)?;
    let mut schedule = PerilSchedule::default();

    for caption in scan(names, &pattern) {
        let token = caption.capture(1);
        let peril = config.canonical_peril(token);

        let group_range = peril_range(token, "_Group");
        if !cells.exists(&group_range) {
            debug!(token, "Peril has no group range, skipping");
            continue;
        }

        let group = match cells.text(&group_range) {
            Some(label) if label != config.peril_exclusion_marker => label,
            _ => {
                debug!(token, peril = %peril, "Peril excluded");
                schedule.exclude(peril);
                continue;
            }
        };

        let terms = schedule.groups.entry(group).or_default();
        terms.add_subperil(&peril);

        let sublimit = cells
            .number(&peril_range(token, "Sublimit"))
            .or_else(|| cells.number(&peril_range(token, "SubLimit")));
        if let Some(value) = sublimit {
            terms.sublimit = Some(value);
        }
        if let Some(value) = cells.number(&peril_range(token, "Ded")) {
            terms.min_deductible = Some(value);
        }
        if let Some(value) = cells.number(&peril_range(token, "MaxDed")) {
            terms.max_deductible = Some(value);
        }
        if let Some(value) = cells.number(&peril_range(token, "PerLocDed")) {
            terms.location_deductible = Some(value);
        }
        if let Some(value) = cells.text(&peril_range(token, "PerLocDedType")) {
            terms.location_deductible_type = Some(value);
        }
        if let Some(value) = cells.number(&peril_range(token, "BIDed")) {
            terms.bi_days_deductible = Some(value);
        }
    }

    Ok(schedule)
}
