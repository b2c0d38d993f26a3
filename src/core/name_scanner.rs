//! Defined-name discovery
//!
//! Repeating structures (perils, zones) are found by matching the workbook's
//! defined names against a naming convention rather than from a fixed list.

use crate::error::{ExtractError, ExtractResult};
use crate::excel::DefinedName;
use regex::Regex;

/// `p_<token>_Caption`
pub const PERIL_CAPTION_PATTERN: &str = r"^p_([^_]+)_Caption$";
/// `p_<group>_<zone>_Caption`
pub const ZONE_CAPTION_PATTERN: &str = r"^p_([^_]+)_([^_]+)_Caption$";

/// A defined name that matched a pattern, with the pattern's capture groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch {
    pub name: String,
    pub target: String,
    pub captures: Vec<String>,
}

impl NameMatch {
    /// Capture group `index` (1-based, as in the pattern)
    pub fn capture(&self, index: usize) -> &str {
        index
            .checked_sub(1)
            .and_then(|i| self.captures.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Match every defined name against `pattern`, in enumeration order.
///
/// Patterns should be anchored; matching is case-sensitive.
pub fn scan(names: &[DefinedName], pattern: &Regex) -> Vec<NameMatch> {
    names
        .iter()
        .filter_map(|defined| {
            let captures = pattern.captures(&defined.name)?;
            Some(NameMatch {
                name: defined.name.clone(),
                target: defined.target.clone(),
                captures: captures
                    .iter()
                    .skip(1)
                    .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
                    .collect(),
            })
        })
        .collect()
}

/// Compile a naming-convention pattern
pub fn compile(pattern: &str) -> ExtractResult<Regex> {
    Regex::new(pattern).map_err(|e| ExtractError::Config(format!("Regex error: {}", e)))
}
